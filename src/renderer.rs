use crate::error::Result;
use crate::options::Attrs;

/// Receives declarations produced by walking a group tree.
///
/// Groups call `add_subgraph` for themselves, `add_node` for each node they
/// hold and `add_edge` for each edge, then recurse. An error from any call
/// aborts the walk.
pub trait GraphRenderer {
    /// Identity standing for "no parent". The group a render starts from is
    /// declared under it.
    fn root_id(&self) -> &str;

    fn add_subgraph(&mut self, parent: &str, id: &str, attrs: &Attrs) -> Result<()>;

    fn add_node(&mut self, parent: &str, id: &str, attrs: &Attrs) -> Result<()>;

    fn add_edge(&mut self, start: &str, end: &str, attrs: &Attrs) -> Result<()>;
}
