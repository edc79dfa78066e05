use crate::error::Result;
use crate::options::{Attrs, Font, Opt, apply_all, format_number, trim_attrs};
use crate::randstr;
use crate::renderer::GraphRenderer;

/// Length of identities generated for nodes built without an explicit id.
pub const DEFAULT_ID_LEN: usize = 12;

pub type NodeOption = Opt<NodeOptions>;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeOptions {
    /// Explicit identity. `None` means a random one is generated.
    pub id: Option<String>,
    pub label: String,
    pub label_location: String,
    pub shape: String,
    pub style: String,
    pub icon: String,
    pub width: f64,
    pub height: f64,
    pub fixed_size: bool,
    pub color: String,
    pub pen_width: f64,
    pub provider: String,
    pub font: Font,
    /// Free-form attributes, applied after the typed fields.
    pub attributes: Attrs,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            id: None,
            label: String::new(),
            label_location: "b".to_string(),
            shape: "box".to_string(),
            style: "rounded".to_string(),
            icon: String::new(),
            width: 1.4,
            height: 1.4,
            fixed_size: true,
            color: String::new(),
            pen_width: 0.0,
            provider: String::new(),
            font: Font::new("Sans-Serif", 13.0, "#2D3436"),
            attributes: Attrs::new(),
        }
    }
}

pub fn id(id: &str) -> NodeOption {
    let id = id.to_string();
    Opt::new(move |o: &mut NodeOptions| o.id = Some(id.clone()))
}

pub fn label(label: &str) -> NodeOption {
    let label = label.to_string();
    Opt::new(move |o: &mut NodeOptions| o.label = label.clone())
}

pub fn shape(shape: &str) -> NodeOption {
    let shape = shape.to_string();
    Opt::new(move |o: &mut NodeOptions| o.shape = shape.clone())
}

pub fn style(style: &str) -> NodeOption {
    let style = style.to_string();
    Opt::new(move |o: &mut NodeOptions| o.style = style.clone())
}

pub fn icon(path: &str) -> NodeOption {
    let path = path.to_string();
    Opt::new(move |o: &mut NodeOptions| o.icon = path.clone())
}

pub fn color(color: &str) -> NodeOption {
    let color = color.to_string();
    Opt::new(move |o: &mut NodeOptions| o.color = color.clone())
}

pub fn provider(provider: &str) -> NodeOption {
    let provider = provider.to_string();
    Opt::new(move |o: &mut NodeOptions| o.provider = provider.clone())
}

pub fn size(width: f64, height: f64) -> NodeOption {
    Opt::new(move |o: &mut NodeOptions| {
        o.width = width;
        o.height = height;
    })
}

pub fn fixed_size(fixed: bool) -> NodeOption {
    Opt::new(move |o: &mut NodeOptions| o.fixed_size = fixed)
}

pub fn font(font: Font) -> NodeOption {
    Opt::new(move |o: &mut NodeOptions| o.font = font.clone())
}

pub fn attribute(key: &str, value: &str) -> NodeOption {
    let (key, value) = (key.to_string(), value.to_string());
    Opt::new(move |o: &mut NodeOptions| {
        o.attributes.insert(key.clone(), value.clone());
    })
}

#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    options: NodeOptions,
}

impl Node {
    /// Builds a node from `opts`, drawing a random identity unless one of the
    /// options supplied it.
    pub fn new(opts: &[NodeOption]) -> Result<Self> {
        let mut options = apply_all(NodeOptions::default(), opts);
        let id = match options.id.take() {
            Some(id) => id,
            None => randstr::string(DEFAULT_ID_LEN)?,
        };
        Ok(Self { id, options })
    }

    pub fn with_id(id: &str, opts: &[NodeOption]) -> Self {
        let mut options = apply_all(NodeOptions::default(), opts);
        options.id = None;
        Self {
            id: id.to_string(),
            options,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &NodeOptions {
        &self.options
    }

    pub fn label(&mut self, label: &str) -> &mut Self {
        self.options.label = label.to_string();
        self
    }

    pub fn color(&mut self, color: &str) -> &mut Self {
        self.options.color = color.to_string();
        self
    }

    pub fn attribute(&mut self, key: &str, value: &str) -> &mut Self {
        self.options.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn attrs(&self) -> Attrs {
        let o = &self.options;
        let mut attrs = Attrs::new();
        attrs.insert("label".into(), o.label.clone());
        attrs.insert("labelloc".into(), o.label_location.clone());
        attrs.insert("shape".into(), o.shape.clone());
        attrs.insert("style".into(), o.style.clone());
        attrs.insert("color".into(), o.color.clone());
        attrs.insert("penwidth".into(), format_number(o.pen_width));
        o.font.write_attrs(&mut attrs);

        if !o.icon.is_empty() {
            attrs.insert("image".into(), o.icon.clone());
            attrs.insert("imagescale".into(), "true".into());
            attrs.insert("width".into(), format_number(o.width));
            attrs.insert("height".into(), format_number(o.height));
            attrs.insert("fixedsize".into(), o.fixed_size.to_string());
        }

        for (k, v) in &o.attributes {
            attrs.insert(k.clone(), v.clone());
        }

        trim_attrs(attrs)
    }

    pub(crate) fn render<R: GraphRenderer + ?Sized>(&self, parent: &str, out: &mut R) -> Result<()> {
        tracing::trace!("declaring node {} under {}", self.id, parent);
        out.add_node(parent, &self.id, &self.attrs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_node_gets_random_id() {
        let a = Node::new(&[]).unwrap();
        let b = Node::new(&[]).unwrap();
        assert_eq!(a.id().len(), DEFAULT_ID_LEN);
        assert!(a.id().bytes().all(|c| c.is_ascii_lowercase()));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn explicit_id_option_is_used() {
        let n = Node::new(&[id("api"), label("API")]).unwrap();
        assert_eq!(n.id(), "api");
        assert_eq!(n.options().id, None);
    }

    #[test]
    fn last_color_wins() {
        let n = Node::with_id("a", &[color("red"), color("blue")]);
        assert_eq!(n.attrs()["color"], "blue");
    }

    #[test]
    fn empty_value_removes_key() {
        let n = Node::with_id("a", &[label("A"), label("")]);
        assert!(!n.attrs().contains_key("label"));

        let n = Node::with_id("a", &[attribute("tooltip", "")]);
        assert!(!n.attrs().contains_key("tooltip"));
    }

    #[test]
    fn free_form_attributes_override_typed_fields() {
        let n = Node::with_id("a", &[shape("box"), attribute("shape", "circle")]);
        assert_eq!(n.attrs()["shape"], "circle");
    }

    #[test]
    fn icon_brings_image_attributes() {
        let plain = Node::with_id("a", &[]).attrs();
        assert!(!plain.contains_key("image"));

        let n = Node::with_id("a", &[icon("assets/x.png"), size(2.0, 1.5)]);
        let attrs = n.attrs();
        assert_eq!(attrs["image"], "assets/x.png");
        assert_eq!(attrs["imagescale"], "true");
        assert_eq!(attrs["width"], "2");
        assert_eq!(attrs["height"], "1.5");
        assert_eq!(attrs["fixedsize"], "true");
    }

    #[test]
    fn non_finite_sizes_are_dropped() {
        let n = Node::with_id("a", &[icon("x.png"), size(f64::NAN, f64::INFINITY)]);
        let attrs = n.attrs();
        assert!(!attrs.contains_key("width"));
        assert!(!attrs.contains_key("height"));
        assert_eq!(attrs["image"], "x.png");
    }

    #[test]
    fn setters_mutate_stored_options() {
        let mut n = Node::with_id("a", &[label("old")]);
        n.label("new").color("#fff").attribute("tooltip", "hi");
        let attrs = n.attrs();
        assert_eq!(attrs["label"], "new");
        assert_eq!(attrs["color"], "#fff");
        assert_eq!(attrs["tooltip"], "hi");
    }

    #[test]
    fn font_size_formats_without_fraction() {
        let n = Node::with_id("a", &[font(Font::new("Mono", 10.0, "#000"))]);
        let attrs = n.attrs();
        assert_eq!(attrs["fontsize"], "10");
        assert_eq!(attrs["fontname"], "Mono");
        assert_eq!(attrs["penwidth"], "0");
    }
}
