pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate subgraph identity `{id}`")]
    DuplicateSubgraph { id: String },

    #[error("subgraph `{id}` declared under unknown parent `{parent}`")]
    UnknownParent { parent: String, id: String },

    #[error("invalid identity {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("random source unavailable: {0}")]
    RandomSource(#[source] rand::Error),

    #[error("syntax error in graph script: unexpected `{context}`")]
    Syntax { context: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
