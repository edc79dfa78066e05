use crate::error::Result;
use crate::options::{Attrs, Font, Opt, apply_all, format_number, trim_attrs};
use crate::renderer::GraphRenderer;

pub type EdgeOption = Opt<EdgeOptions>;

/// Arrowhead placement (`dir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeDirection {
    #[default]
    Forward,
    Back,
    Both,
    None,
}

impl EdgeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeDirection::Forward => "forward",
            EdgeDirection::Back => "back",
            EdgeDirection::Both => "both",
            EdgeDirection::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOptions {
    pub label: String,
    pub color: String,
    pub style: String,
    pub direction: EdgeDirection,
    pub weight: Option<u32>,
    pub pen_width: Option<f64>,
    pub font: Font,
    pub attributes: Attrs,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            label: String::new(),
            color: "#7B8894".to_string(),
            style: String::new(),
            direction: EdgeDirection::Forward,
            weight: None,
            pen_width: None,
            font: Font::new("Sans-Serif", 13.0, "#2D3436"),
            attributes: Attrs::new(),
        }
    }
}

pub fn label(label: &str) -> EdgeOption {
    let label = label.to_string();
    Opt::new(move |o: &mut EdgeOptions| o.label = label.clone())
}

pub fn color(color: &str) -> EdgeOption {
    let color = color.to_string();
    Opt::new(move |o: &mut EdgeOptions| o.color = color.clone())
}

pub fn style(style: &str) -> EdgeOption {
    let style = style.to_string();
    Opt::new(move |o: &mut EdgeOptions| o.style = style.clone())
}

pub fn direction(direction: EdgeDirection) -> EdgeOption {
    Opt::new(move |o: &mut EdgeOptions| o.direction = direction)
}

pub fn forward() -> EdgeOption {
    direction(EdgeDirection::Forward)
}

pub fn back() -> EdgeOption {
    direction(EdgeDirection::Back)
}

pub fn bidirectional() -> EdgeOption {
    direction(EdgeDirection::Both)
}

pub fn undirected() -> EdgeOption {
    direction(EdgeDirection::None)
}

pub fn weight(weight: u32) -> EdgeOption {
    Opt::new(move |o: &mut EdgeOptions| o.weight = Some(weight))
}

pub fn pen_width(width: f64) -> EdgeOption {
    Opt::new(move |o: &mut EdgeOptions| o.pen_width = Some(width))
}

pub fn font(font: Font) -> EdgeOption {
    Opt::new(move |o: &mut EdgeOptions| o.font = font.clone())
}

pub fn attribute(key: &str, value: &str) -> EdgeOption {
    let (key, value) = (key.to_string(), value.to_string());
    Opt::new(move |o: &mut EdgeOptions| {
        o.attributes.insert(key.clone(), value.clone());
    })
}

/// A directed connection between two node identities.
///
/// The edge never owns its endpoints; either id may be missing from the
/// diagram, in which case the renderer decides what to draw.
#[derive(Debug, Clone)]
pub struct Edge {
    id: String,
    start: String,
    end: String,
    options: EdgeOptions,
}

impl Edge {
    pub fn new(start: &str, end: &str, opts: &[EdgeOption]) -> Self {
        Self {
            id: base_id(start, end),
            start: start.to_string(),
            end: end.to_string(),
            options: apply_all(EdgeOptions::default(), opts),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn options(&self) -> &EdgeOptions {
        &self.options
    }

    /// Distinguishes this edge from others between the same pair.
    pub(crate) fn with_suffix(mut self, n: usize) -> Self {
        self.id = format!("{}#{n}", base_id(&self.start, &self.end));
        self
    }

    pub fn attrs(&self) -> Attrs {
        let o = &self.options;
        let mut attrs = Attrs::new();
        attrs.insert("label".into(), o.label.clone());
        attrs.insert("color".into(), o.color.clone());
        attrs.insert("style".into(), o.style.clone());
        attrs.insert("dir".into(), o.direction.as_str().into());
        attrs.insert(
            "weight".into(),
            o.weight.map(|w| w.to_string()).unwrap_or_default(),
        );
        attrs.insert(
            "penwidth".into(),
            o.pen_width.map(format_number).unwrap_or_default(),
        );
        o.font.write_attrs(&mut attrs);

        for (k, v) in &o.attributes {
            attrs.insert(k.clone(), v.clone());
        }

        trim_attrs(attrs)
    }

    pub(crate) fn render<R: GraphRenderer + ?Sized>(&self, out: &mut R) -> Result<()> {
        tracing::trace!("declaring edge {} ({} -> {})", self.id, self.start, self.end);
        out.add_edge(&self.start, &self.end, &self.attrs())
    }
}

fn base_id(start: &str, end: &str) -> String {
    format!("{start}->{end}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn id_derives_from_endpoints() {
        let e = Edge::new("a", "b", &[]);
        assert_eq!(e.id(), "a->b");
        assert_eq!(e.start(), "a");
        assert_eq!(e.end(), "b");
        assert_eq!(e.clone().with_suffix(2).id(), "a->b#2");
    }

    #[test]
    fn default_attrs() {
        let attrs = Edge::new("a", "b", &[]).attrs();
        assert_eq!(attrs["color"], "#7B8894");
        assert_eq!(attrs["dir"], "forward");
        assert!(!attrs.contains_key("weight"));
        assert!(!attrs.contains_key("label"));
        assert!(!attrs.contains_key("penwidth"));
    }

    #[test]
    fn options_override_in_order() {
        let e = Edge::new(
            "a",
            "b",
            &[color("red"), weight(3), bidirectional(), color("blue"), style("dashed")],
        );
        let attrs = e.attrs();
        assert_eq!(attrs["color"], "blue");
        assert_eq!(attrs["weight"], "3");
        assert_eq!(attrs["dir"], "both");
        assert_eq!(attrs["style"], "dashed");
    }

    #[test]
    fn empty_attribute_is_dropped() {
        let e = Edge::new("a", "b", &[color("")]);
        assert!(!e.attrs().contains_key("color"));
    }
}
