//! Declarative diagrams rendered through Graphviz.
//!
//! Build a tree of [`Group`]s holding [`Node`]s and [`Edge`]s, usually under a
//! [`Diagram`], then render it to DOT:
//!
//! ```
//! use diagrams::{Diagram, Node, edge, node};
//!
//! let mut d = Diagram::new(&[]);
//! let api = Node::with_id("api", &[node::label("API")]);
//! let db = Node::with_id("db", &[node::label("DB")]);
//! d.new_group("backend", &[]).connect(api, db, &[edge::label("reads")]);
//!
//! let dot = d.to_dot().unwrap();
//! assert!(dot.contains("subgraph \"cluster_backend\""));
//! assert!(dot.contains("\"api\" -> \"db\""));
//! ```

pub mod diagram;
pub mod dot;
pub mod edge;
pub mod error;
pub mod graph_ast;
pub mod graph_parser;
pub mod group;
pub mod node;
pub mod nodes;
pub mod options;
pub mod randstr;
pub mod renderer;

pub use diagram::{Diagram, DiagramOption, DiagramOptions};
pub use dot::DotGraph;
pub use edge::{Edge, EdgeOption, EdgeOptions};
pub use error::{Error, Result};
pub use group::{Background, Group, GroupOption, GroupOptions};
pub use node::{Node, NodeOption, NodeOptions};
pub use options::{Attrs, Direction, Font, Opt, merge_option_sets};
pub use renderer::GraphRenderer;

/// Parses a flowchart script and renders it straight to DOT text.
pub fn render(input: &str) -> Result<String> {
    render_with_options(input, &[])
}

pub fn render_with_options(input: &str, opts: &[DiagramOption]) -> Result<String> {
    graph_parser::parse_graph(input)?.into_diagram(opts).to_dot()
}
