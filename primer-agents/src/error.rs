use primer_core::PrimerError;
use primer_graph::GraphError;
use primer_rag::RagError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] PrimerError),

    #[error(transparent)]
    Rag(#[from] RagError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
