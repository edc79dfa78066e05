use std::collections::HashSet;

use crate::diagram::{self, Diagram, DiagramOption};
use crate::edge::{self, EdgeOption};
use crate::group::{self, Group};
use crate::node::{self, Node, NodeOption};
use crate::options::{Direction, merge_option_sets};

#[derive(Debug, Clone, PartialEq)]
pub struct GraphScript {
    pub direction: Direction,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node(NodeDecl),
    /// One source fanned out to one or more targets (`A --> B & C`).
    Edges(Vec<EdgeDecl>),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub name: String,
    pub label: String,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDecl {
    pub from: NodeDecl,
    pub to: NodeDecl,
    pub edge_type: EdgeType,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Box,
    Round,
    Diamond,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeType {
    Arrow,
    OpenLink,
    DottedArrow,
    DottedLink,
    ThickArrow,
    ThickLink,
}

impl NodeDecl {
    fn node_options(&self) -> Vec<NodeOption> {
        let shape = match self.shape {
            NodeShape::Box => vec![node::shape("box"), node::style("")],
            NodeShape::Round => vec![node::shape("box"), node::style("rounded")],
            NodeShape::Diamond => vec![node::shape("diamond"), node::style("")],
            NodeShape::Circle => vec![node::shape("circle"), node::style("")],
        };
        merge_option_sets([shape, vec![node::label(&self.label)]])
    }
}

impl EdgeDecl {
    fn edge_options(&self) -> Vec<EdgeOption> {
        let mut opts = match self.edge_type {
            EdgeType::Arrow => vec![],
            EdgeType::OpenLink => vec![edge::undirected()],
            EdgeType::DottedArrow => vec![edge::style("dotted")],
            EdgeType::DottedLink => vec![edge::style("dotted"), edge::undirected()],
            EdgeType::ThickArrow => vec![edge::style("bold")],
            EdgeType::ThickLink => vec![edge::style("bold"), edge::undirected()],
        };
        if let Some(label) = &self.label {
            opts.push(edge::label(label));
        }
        opts
    }
}

impl GraphScript {
    /// Lowers the script into builder calls on a new diagram.
    ///
    /// A node lands in the group where it is first mentioned and keeps that
    /// first label. Edges are recorded in the group whose block contains them.
    /// `opts` are applied after the script's own direction.
    pub fn into_diagram(self, opts: &[DiagramOption]) -> Diagram {
        let base = [diagram::direction(self.direction)];
        let mut d = Diagram::new(&merge_option_sets([&base[..], opts]));
        let mut placed = HashSet::new();
        lower(&self.statements, d.root_mut(), &mut placed);
        d
    }
}

fn lower(statements: &[Statement], target: &mut Group, placed: &mut HashSet<String>) {
    for stmt in statements {
        match stmt {
            Statement::Node(decl) => place(decl, target, placed),
            Statement::Edges(edges) => {
                for e in edges {
                    place(&e.from, target, placed);
                    place(&e.to, target, placed);
                    target.connect_by_id(&e.from.id, &e.to.id, &e.edge_options());
                }
            }
            Statement::Subgraph(sg) => {
                // Repeated blocks with one name merge into the first.
                let child = target.subgroup(&sg.name, &[group::label(&sg.label)]);
                lower(&sg.statements, child, placed);
            }
        }
    }
}

fn place(decl: &NodeDecl, target: &mut Group, placed: &mut HashSet<String>) {
    if placed.insert(decl.id.clone()) {
        target.add([Node::with_id(&decl.id, &decl.node_options())]);
    }
}
