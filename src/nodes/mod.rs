//! Provider icon packages.
//!
//! Each provider service is an [`IconSet`]: a directory of icon assets plus the
//! base options every node of that provider carries. A node built from a set
//! gets, in order, the icon option, the provider's base options and then the
//! caller's options, so callers can override anything the provider sets.

pub mod gcp;

use crate::error::Result;
use crate::node::{self, Node, NodeOption};
use crate::options::merge_option_sets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub provider: &'static str,
    pub path: &'static str,
}

impl IconSet {
    pub const fn new(provider: &'static str, path: &'static str) -> Self {
        Self { provider, path }
    }

    pub fn base_options(&self) -> Vec<NodeOption> {
        vec![node::provider(self.provider), node::shape("none"), node::style("")]
    }

    pub fn icon_path(&self, icon: &str) -> String {
        format!("{}/{}.png", self.path, icon)
    }

    /// Builds a node showing `icon` from this set.
    pub fn node(&self, icon: &str, opts: &[NodeOption]) -> Result<Node> {
        let icon = [node::icon(&self.icon_path(icon))];
        Node::new(&merge_option_sets([&icon[..], &self.base_options()[..], opts]))
    }
}
