use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// Structural problem found by `compile`.
    #[error("graph is malformed: {0}")]
    InvalidGraph(String),

    /// An edge leaves from a node that was never added.
    #[error("edge source '{0}' is not a node of this graph")]
    NodeNotFound(String),

    /// An edge or route leads to a node that was never added.
    #[error("edge target '{0}' is not a node of this graph")]
    EdgeTargetNotFound(String),

    #[error("graph has no edge from START")]
    NoEntryPoint,

    /// The run needed more super-steps than allowed.
    #[error("stopped after {0} steps without reaching END")]
    RecursionLimitExceeded(usize),

    #[error("node '{node}' failed: {message}")]
    NodeExecutionFailed { node: String, message: String },

    /// A router returned a key with no mapping that is not END either.
    #[error("router of '{source_node}' chose '{route}', which has no target")]
    UnknownRouteTarget { source_node: String, route: String },

    #[error(transparent)]
    Core(#[from] primer_core::PrimerError),
}
