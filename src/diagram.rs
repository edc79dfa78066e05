use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dot::DotGraph;
use crate::edge::EdgeOption;
use crate::error::Result;
use crate::group::{Background, Group, GroupOption};
use crate::node::Node;
use crate::options::{Attrs, Direction, Font, Opt, apply_all, format_number, trim_attrs};

pub type DiagramOption = Opt<DiagramOptions>;

/// Identity of the subgraph holding everything added to the diagram directly.
pub const ROOT_GROUP_ID: &str = "root";

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOptions {
    pub name: String,
    /// Output file stem used by [`Diagram::render`].
    pub filename: String,
    pub label: String,
    pub label_location: String,
    pub direction: Direction,
    pub pad: f64,
    pub splines: String,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub font: Font,
    pub attributes: Attrs,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            name: "diagram".to_string(),
            filename: "diagram".to_string(),
            label: String::new(),
            label_location: "t".to_string(),
            direction: Direction::default(),
            pad: 2.0,
            splines: "ortho".to_string(),
            node_sep: 0.6,
            rank_sep: 0.75,
            font: Font::new("Sans-Serif", 15.0, "#2D3436"),
            attributes: Attrs::new(),
        }
    }
}

pub fn name(name: &str) -> DiagramOption {
    let name = name.to_string();
    Opt::new(move |o: &mut DiagramOptions| o.name = name.clone())
}

pub fn filename(stem: &str) -> DiagramOption {
    let stem = stem.to_string();
    Opt::new(move |o: &mut DiagramOptions| o.filename = stem.clone())
}

pub fn label(label: &str) -> DiagramOption {
    let label = label.to_string();
    Opt::new(move |o: &mut DiagramOptions| o.label = label.clone())
}

pub fn direction(direction: Direction) -> DiagramOption {
    Opt::new(move |o: &mut DiagramOptions| o.direction = direction)
}

pub fn splines(splines: &str) -> DiagramOption {
    let splines = splines.to_string();
    Opt::new(move |o: &mut DiagramOptions| o.splines = splines.clone())
}

pub fn font(font: Font) -> DiagramOption {
    Opt::new(move |o: &mut DiagramOptions| o.font = font.clone())
}

pub fn attribute(key: &str, value: &str) -> DiagramOption {
    let (key, value) = (key.to_string(), value.to_string());
    Opt::new(move |o: &mut DiagramOptions| {
        o.attributes.insert(key.clone(), value.clone());
    })
}

/// A whole drawing: graph-level options plus the root group.
///
/// Top-level clusters created through [`Diagram::new_group`] start on the first
/// background tier.
#[derive(Debug, Clone)]
pub struct Diagram {
    options: DiagramOptions,
    root: Group,
}

impl Diagram {
    pub fn new(opts: &[DiagramOption]) -> Self {
        Self {
            options: apply_all(DiagramOptions::default(), opts),
            // Last tier, so the first level of clusters wraps around to blue.
            root: Group::with_id(ROOT_GROUP_ID.to_string(), Background::Yellow, &[]),
        }
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    pub fn add(&mut self, nodes: impl IntoIterator<Item = Node>) -> &mut Self {
        self.root.add(nodes);
        self
    }

    pub fn connect(&mut self, start: Node, end: Node, opts: &[EdgeOption]) -> &mut Self {
        self.root.connect(start, end, opts);
        self
    }

    pub fn connect_by_id(&mut self, start: &str, end: &str, opts: &[EdgeOption]) -> &mut Self {
        self.root.connect_by_id(start, end, opts);
        self
    }

    pub fn group(&mut self, group: Group) -> &mut Group {
        self.root.group(group)
    }

    pub fn new_group(&mut self, name: &str, opts: &[GroupOption]) -> &mut Group {
        self.root.new_group(name, opts)
    }

    pub fn attrs(&self) -> Attrs {
        let o = &self.options;
        let mut attrs = Attrs::new();
        attrs.insert("label".into(), o.label.clone());
        attrs.insert("labelloc".into(), o.label_location.clone());
        attrs.insert("rankdir".into(), o.direction.as_str().into());
        attrs.insert("pad".into(), format_number(o.pad));
        attrs.insert("splines".into(), o.splines.clone());
        attrs.insert("nodesep".into(), format_number(o.node_sep));
        attrs.insert("ranksep".into(), format_number(o.rank_sep));
        o.font.write_attrs(&mut attrs);

        for (k, v) in &o.attributes {
            attrs.insert(k.clone(), v.clone());
        }

        trim_attrs(attrs)
    }

    /// Walks the whole tree into a fresh [`DotGraph`].
    pub fn to_graph(&self) -> Result<DotGraph> {
        let mut graph = DotGraph::with_attrs(&self.options.name, self.attrs());
        self.root.render(&mut graph)?;
        Ok(graph)
    }

    pub fn to_dot(&self) -> Result<String> {
        Ok(self.to_graph()?.to_string())
    }

    /// Writes `<outdir>/<filename>.dot`, creating `outdir` if needed, and
    /// returns the written path.
    pub fn render(&self, outdir: impl AsRef<Path>) -> Result<PathBuf> {
        let graph = self.to_graph()?;

        let outdir = outdir.as_ref();
        std::fs::create_dir_all(outdir)?;
        let path = outdir.join(format!("{}.dot", self.options.filename));

        let mut w = BufWriter::new(File::create(&path)?);
        write!(w, "{graph}")?;
        w.flush()?;

        tracing::debug!("wrote {}", path.display());
        Ok(path)
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_graph_attrs() {
        let attrs = Diagram::default().attrs();
        assert_eq!(attrs["rankdir"], "LR");
        assert_eq!(attrs["pad"], "2");
        assert_eq!(attrs["nodesep"], "0.6");
        assert_eq!(attrs["ranksep"], "0.75");
        assert_eq!(attrs["fontsize"], "15");
        assert!(!attrs.contains_key("label"));
    }

    #[test]
    fn options_override_defaults() {
        let d = Diagram::new(&[
            name("arch"),
            direction(Direction::TopToBottom),
            label("Architecture"),
            attribute("splines", "spline"),
        ]);
        let attrs = d.attrs();
        assert_eq!(d.options().name, "arch");
        assert_eq!(attrs["rankdir"], "TB");
        assert_eq!(attrs["label"], "Architecture");
        assert_eq!(attrs["splines"], "spline");
    }

    #[test]
    fn top_level_groups_start_blue() {
        let mut d = Diagram::default();
        let g = d.new_group("a", &[]);
        assert_eq!(g.background(), Background::Blue);
        assert_eq!(g.parent_id(), Some(ROOT_GROUP_ID));
        let inner = g.new_group("b", &[]);
        assert_eq!(inner.background(), Background::Green);
    }

    #[test]
    fn root_subgraph_carries_no_cluster_styling() {
        let d = Diagram::default();
        assert!(!d.root().is_cluster());
        assert!(d.root().attrs().is_empty());
    }
}
