//! Google Cloud icons.

use crate::error::Result;
use crate::node::{Node, NodeOption};

use super::IconSet;

pub const PROVIDER: &str = "gcp";

pub struct Api(IconSet);

pub const API: Api = Api(IconSet::new(PROVIDER, "assets/gcp/api"));

impl Api {
    pub fn endpoints(&self, opts: &[NodeOption]) -> Result<Node> {
        self.0.node("endpoints", opts)
    }

    pub fn icons(&self) -> &IconSet {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_icon() {
        let n = API.endpoints(&[]).unwrap();
        assert_eq!(n.attrs()["image"], "assets/gcp/api/endpoints.png");
        assert_eq!(n.options().provider, PROVIDER);
        assert_eq!(API.icons().path, "assets/gcp/api");
    }
}
