//! Clusters: the hierarchical containers of a diagram.
//!
//! A [`Group`] owns its nodes, its edges and its child groups. Rendering walks
//! the tree depth first: the group declares itself, then its nodes, then its
//! edges, then each child in insertion order.
//!
//! Node and edge maps are keyed by identity and insertion ordered. Inserting an
//! existing node id replaces the stored node in place; inserting an existing
//! edge id appends a `#n` suffix so parallel edges survive.
//!
//! A group is owned by at most one parent. Moving a group to another parent is
//! [`Group::take_group`] followed by [`Group::group`].

use std::fmt;

use indexmap::IndexMap;

use crate::edge::{Edge, EdgeOption};
use crate::error::Result;
use crate::node::Node;
use crate::options::{Attrs, Font, Opt, apply_all, trim_attrs};
use crate::renderer::GraphRenderer;

/// Background tier of a group. Nested groups move to the next tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Blue,
    Green,
    Purple,
    Yellow,
}

impl Background {
    pub const ALL: [Background; 4] = [
        Background::Blue,
        Background::Green,
        Background::Purple,
        Background::Yellow,
    ];

    pub fn color(self) -> &'static str {
        match self {
            Background::Blue => "#E5F5FD",
            Background::Green => "#EBF3E7",
            Background::Purple => "#ECE8F6",
            Background::Yellow => "#FDF7E3",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Background::Blue => Background::Green,
            Background::Green => Background::Purple,
            Background::Purple => Background::Yellow,
            Background::Yellow => Background::Blue,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}

pub type GroupOption = Opt<GroupOptions>;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupOptions {
    pub label: String,
    pub label_justify: String,
    pub pen_color: String,
    pub background_color: String,
    pub shape: String,
    pub style: String,
    pub font: Font,
    pub attributes: Attrs,
}

impl GroupOptions {
    fn for_background(bg: Background) -> Self {
        Self {
            label: String::new(),
            label_justify: "l".to_string(),
            pen_color: "#AEB6BE".to_string(),
            background_color: bg.color().to_string(),
            shape: "box".to_string(),
            style: "rounded".to_string(),
            font: Font::new("Sans-Serif", 12.0, "#2D3436"),
            attributes: Attrs::new(),
        }
    }
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self::for_background(Background::default())
    }
}

pub fn label(label: &str) -> GroupOption {
    let label = label.to_string();
    Opt::new(move |o: &mut GroupOptions| o.label = label.clone())
}

pub fn background_color(color: &str) -> GroupOption {
    let color = color.to_string();
    Opt::new(move |o: &mut GroupOptions| o.background_color = color.clone())
}

pub fn with_background(bg: Background) -> GroupOption {
    background_color(bg.color())
}

pub fn pen_color(color: &str) -> GroupOption {
    let color = color.to_string();
    Opt::new(move |o: &mut GroupOptions| o.pen_color = color.clone())
}

pub fn style(style: &str) -> GroupOption {
    let style = style.to_string();
    Opt::new(move |o: &mut GroupOptions| o.style = style.clone())
}

pub fn font(font: Font) -> GroupOption {
    Opt::new(move |o: &mut GroupOptions| o.font = font.clone())
}

pub fn attribute(key: &str, value: &str) -> GroupOption {
    let (key, value) = (key.to_string(), value.to_string());
    Opt::new(move |o: &mut GroupOptions| {
        o.attributes.insert(key.clone(), value.clone());
    })
}

#[derive(Debug, Clone)]
pub struct Group {
    id: String,
    bg: Background,
    options: GroupOptions,
    parent: Option<String>,
    children: IndexMap<String, Group>,
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
}

impl Group {
    /// A top-level cluster named `cluster_<name>` on the first background tier.
    pub fn new(name: &str, opts: &[GroupOption]) -> Self {
        Self::with_id(format!("cluster_{name}"), Background::default(), opts)
    }

    pub(crate) fn with_id(id: String, bg: Background, opts: &[GroupOption]) -> Self {
        Self {
            id,
            bg,
            options: apply_all(GroupOptions::for_background(bg), opts),
            parent: None,
            children: IndexMap::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn background(&self) -> Background {
        self.bg
    }

    pub fn options(&self) -> &GroupOptions {
        &self.options
    }

    /// Identity of the owning group, if attached.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn children(&self) -> impl Iterator<Item = &Group> {
        self.children.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn child(&self, id: &str) -> Option<&Group> {
        self.children.get(id)
    }

    pub fn child_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.children.get_mut(id)
    }

    pub fn add(&mut self, nodes: impl IntoIterator<Item = Node>) -> &mut Self {
        for n in nodes {
            self.nodes.insert(n.id().to_string(), n);
        }
        self
    }

    pub fn connect(&mut self, start: Node, end: Node, opts: &[EdgeOption]) -> &mut Self {
        let (start_id, end_id) = (start.id().to_string(), end.id().to_string());
        self.add([start, end]);
        self.connect_by_id(&start_id, &end_id, opts)
    }

    pub fn connect_by_id(&mut self, start: &str, end: &str, opts: &[EdgeOption]) -> &mut Self {
        let mut edge = Edge::new(start, end, opts);
        let mut n = 0;
        while self.edges.contains_key(edge.id()) {
            n += 1;
            edge = edge.with_suffix(n);
        }
        self.edges.insert(edge.id().to_string(), edge);
        self
    }

    /// One edge from every node held directly by this group to `end`.
    pub fn connect_all_to(&mut self, end: &str, opts: &[EdgeOption]) -> &mut Self {
        let ids: Vec<String> = self.nodes.keys().cloned().collect();
        for id in ids {
            self.connect_by_id(&id, end, opts);
        }
        self
    }

    /// One edge from `start` to every node held directly by this group.
    pub fn connect_all_from(&mut self, start: &str, opts: &[EdgeOption]) -> &mut Self {
        let ids: Vec<String> = self.nodes.keys().cloned().collect();
        for id in ids {
            self.connect_by_id(start, &id, opts);
        }
        self
    }

    /// Returns the child cluster `name`, creating it with [`Group::new_group`]
    /// when absent. Options only apply on creation.
    pub fn subgroup(&mut self, name: &str, opts: &[GroupOption]) -> &mut Group {
        let id = format!("cluster_{name}");
        if !self.children.contains_key(&id) {
            return self.new_group(name, opts);
        }
        &mut self.children[&id]
    }

    /// Attaches `child` and returns it. A child with the same id is replaced.
    pub fn group(&mut self, mut child: Group) -> &mut Group {
        child.parent = Some(self.id.clone());
        let id = child.id.clone();
        if self.children.insert(id.clone(), child).is_some() {
            tracing::debug!("group {} replaced child {}", self.id, id);
        }
        &mut self.children[&id]
    }

    /// Detaches the child `id`, leaving it without a parent.
    pub fn take_group(&mut self, id: &str) -> Option<Group> {
        let mut child = self.children.shift_remove(id)?;
        child.parent = None;
        Some(child)
    }

    /// Creates a child cluster on the next background tier and returns it.
    pub fn new_group(&mut self, name: &str, opts: &[GroupOption]) -> &mut Group {
        let child = Group::with_id(format!("cluster_{name}"), self.bg.next(), opts);
        self.group(child)
    }

    pub fn label(&mut self, label: &str) -> &mut Self {
        self.options.label = label.to_string();
        self
    }

    pub fn background_color(&mut self, color: &str) -> &mut Self {
        self.options.background_color = color.to_string();
        self
    }

    /// Graphviz only draws subgraphs whose id starts with `cluster`.
    pub fn is_cluster(&self) -> bool {
        self.id.starts_with("cluster")
    }

    /// Subgraph attributes. A plain (non-cluster) subgraph draws nothing, so it
    /// only carries its free-form attributes such as `rank`.
    pub fn attrs(&self) -> Attrs {
        let o = &self.options;
        if !self.is_cluster() {
            return trim_attrs(o.attributes.clone());
        }

        let mut attrs = Attrs::new();
        attrs.insert("label".into(), o.label.clone());
        attrs.insert("labeljust".into(), o.label_justify.clone());
        attrs.insert("pencolor".into(), o.pen_color.clone());
        attrs.insert("bgcolor".into(), o.background_color.clone());
        attrs.insert("shape".into(), o.shape.clone());
        attrs.insert("style".into(), o.style.clone());
        o.font.write_attrs(&mut attrs);

        for (k, v) in &o.attributes {
            attrs.insert(k.clone(), v.clone());
        }

        trim_attrs(attrs)
    }

    /// Declares this group under the renderer's root, then everything below it.
    pub fn render<R: GraphRenderer + ?Sized>(&self, out: &mut R) -> Result<()> {
        let root = out.root_id().to_string();
        self.render_under(&root, out)
    }

    fn render_under<R: GraphRenderer + ?Sized>(&self, parent: &str, out: &mut R) -> Result<()> {
        tracing::trace!("declaring subgraph {} under {}", self.id, parent);
        out.add_subgraph(parent, &self.id, &self.attrs())?;

        for n in self.nodes.values() {
            n.render(&self.id, out)?;
        }

        for e in self.edges.values() {
            e.render(out)?;
        }

        for child in self.children.values() {
            child.render_under(&self.id, out)?;
        }

        Ok(())
    }
}
