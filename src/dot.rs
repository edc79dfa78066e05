//! Graphviz DOT backend.
//!
//! [`DotGraph`] collects declarations through [`GraphRenderer`] and prints
//! them as a `digraph`: subgraphs nested under their parents, nodes inside the
//! subgraph that declared them last, edges at the top level.
//!
//! The graph name is only printed. Top-level declarations use [`TOP_SCOPE`]
//! as their parent, so a subgraph may share the graph's name.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::options::Attrs;
use crate::renderer::GraphRenderer;

/// Parent id of top-level declarations. Empty ids are rejected, so no
/// subgraph can collide with it.
pub const TOP_SCOPE: &str = "";

#[derive(Debug, Clone)]
struct Decl {
    parent: String,
    attrs: Attrs,
}

#[derive(Debug, Clone)]
struct EdgeDecl {
    start: String,
    end: String,
    attrs: Attrs,
}

#[derive(Debug, Clone)]
pub struct DotGraph {
    name: String,
    attrs: Attrs,
    subgraphs: IndexMap<String, Decl>,
    nodes: IndexMap<String, Decl>,
    edges: Vec<EdgeDecl>,
}

impl DotGraph {
    pub fn new(name: &str) -> Self {
        Self::with_attrs(name, Attrs::new())
    }

    pub fn with_attrs(name: &str, attrs: Attrs) -> Self {
        Self {
            name: name.to_string(),
            attrs,
            subgraphs: IndexMap::new(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Subgraph a node currently belongs to, [`TOP_SCOPE`] at the top level.
    pub fn node_parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|d| d.parent.as_str())
    }

    pub fn subgraph_parent(&self, id: &str) -> Option<&str> {
        self.subgraphs.get(id).map(|d| d.parent.as_str())
    }

    fn is_known_parent(&self, id: &str) -> bool {
        id == TOP_SCOPE || self.subgraphs.contains_key(id)
    }

    fn write_scope(
        &self,
        f: &mut fmt::Formatter<'_>,
        scope: &str,
        level: usize,
        subgraphs_by_parent: &HashMap<&str, Vec<&str>>,
        nodes_by_parent: &HashMap<&str, Vec<&str>>,
    ) -> fmt::Result {
        for id in nodes_by_parent.get(scope).into_iter().flatten() {
            write_indent(f, level)?;
            write!(f, "{}", quote(id))?;
            write_attr_list(f, &self.nodes[*id].attrs)?;
            writeln!(f, ";")?;
        }

        for id in subgraphs_by_parent.get(scope).into_iter().flatten() {
            write_indent(f, level)?;
            writeln!(f, "subgraph {} {{", quote(id))?;
            write_graph_attrs(f, &self.subgraphs[*id].attrs, level + 1)?;
            self.write_scope(f, id, level + 1, subgraphs_by_parent, nodes_by_parent)?;
            write_indent(f, level)?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}

impl GraphRenderer for DotGraph {
    fn root_id(&self) -> &str {
        TOP_SCOPE
    }

    fn add_subgraph(&mut self, parent: &str, id: &str, attrs: &Attrs) -> Result<()> {
        validate_id(id)?;
        if self.subgraphs.contains_key(id) {
            return Err(Error::DuplicateSubgraph { id: id.to_string() });
        }
        if !self.is_known_parent(parent) {
            return Err(Error::UnknownParent {
                parent: parent.to_string(),
                id: id.to_string(),
            });
        }
        self.subgraphs.insert(
            id.to_string(),
            Decl {
                parent: parent.to_string(),
                attrs: attrs.clone(),
            },
        );
        Ok(())
    }

    fn add_node(&mut self, parent: &str, id: &str, attrs: &Attrs) -> Result<()> {
        validate_id(id)?;
        let decl = Decl {
            parent: parent.to_string(),
            attrs: attrs.clone(),
        };
        if let Some(prev) = self.nodes.insert(id.to_string(), decl) {
            tracing::debug!("node {} redeclared, moving from {} to {}", id, prev.parent, parent);
        }
        Ok(())
    }

    fn add_edge(&mut self, start: &str, end: &str, attrs: &Attrs) -> Result<()> {
        validate_id(start)?;
        validate_id(end)?;
        self.edges.push(EdgeDecl {
            start: start.to_string(),
            end: end.to_string(),
            attrs: attrs.clone(),
        });
        Ok(())
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut subgraphs_by_parent: HashMap<&str, Vec<&str>> = HashMap::new();
        for (id, decl) in &self.subgraphs {
            subgraphs_by_parent
                .entry(decl.parent.as_str())
                .or_default()
                .push(id.as_str());
        }
        let mut nodes_by_parent: HashMap<&str, Vec<&str>> = HashMap::new();
        for (id, decl) in &self.nodes {
            nodes_by_parent
                .entry(decl.parent.as_str())
                .or_default()
                .push(id.as_str());
        }

        writeln!(f, "digraph {} {{", quote(&self.name))?;
        write_graph_attrs(f, &self.attrs, 1)?;
        self.write_scope(f, TOP_SCOPE, 1, &subgraphs_by_parent, &nodes_by_parent)?;

        // Nodes whose parent never became a subgraph still have to appear.
        for (id, decl) in &self.nodes {
            if !self.is_known_parent(&decl.parent) {
                write_indent(f, 1)?;
                write!(f, "{}", quote(id))?;
                write_attr_list(f, &decl.attrs)?;
                writeln!(f, ";")?;
            }
        }

        for e in &self.edges {
            write_indent(f, 1)?;
            write!(f, "{} -> {}", quote(&e.start), quote(&e.end))?;
            write_attr_list(f, &e.attrs)?;
            writeln!(f, ";")?;
        }

        writeln!(f, "}}")
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidId {
            id: id.to_string(),
            reason: "identity is empty",
        });
    }
    if id.chars().any(char::is_control) {
        return Err(Error::InvalidId {
            id: id.to_string(),
            reason: "identity contains control characters",
        });
    }
    Ok(())
}

/// Quotes an id or attribute value.
///
/// A value wrapped in `<...>` is a Graphviz HTML-like label and is written
/// raw. To show a literal `<none>`, pass the HTML form `<&lt;none&gt;>`.
pub fn quote(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('<') && s.ends_with('>') {
        return s.to_string();
    }
    format!(
        "\"{}\"",
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    )
}

/// Attribute names are written bare when they are plain identifiers and
/// quoted otherwise.
fn attr_key(key: &str) -> String {
    let plain = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        key.to_string()
    } else {
        format!("\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str("  ")?;
    }
    Ok(())
}

fn write_graph_attrs(f: &mut fmt::Formatter<'_>, attrs: &Attrs, level: usize) -> fmt::Result {
    for (k, v) in attrs {
        write_indent(f, level)?;
        writeln!(f, "{}={};", attr_key(k), quote(v))?;
    }
    Ok(())
}

fn write_attr_list(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    f.write_str(" [")?;
    for (i, (k, v)) in attrs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", attr_key(k), quote(v))?;
    }
    f.write_str("]")
}
