//! Error types for retrieval.

use primer_core::PrimerError;

/// Errors raised while loading, embedding, storing, or searching documents.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("PDF file not found at path: {0}")]
    FileNotFound(String),

    #[error("Failed to load document: {0}")]
    LoadError(String),

    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError { provider: String, message: String },

    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError { backend: String, message: String },

    #[error("Chunking error: {0}")]
    ChunkingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;

impl From<RagError> for PrimerError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::ConfigError(message) => PrimerError::Config(message),
            RagError::Io(e) => PrimerError::Io(e),
            other => PrimerError::Retrieval(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message() {
        let err = RagError::FileNotFound("materials/missing.pdf".to_string());
        assert_eq!(err.to_string(), "PDF file not found at path: materials/missing.pdf");
    }

    #[test]
    fn test_into_primer_error() {
        let err: PrimerError = RagError::VectorStoreError {
            backend: "memory".into(),
            message: "no such collection".into(),
        }
        .into();
        assert!(matches!(err, PrimerError::Retrieval(ref m) if m.contains("no such collection")));

        let err: PrimerError = RagError::ConfigError("top_k must be positive".into()).into();
        assert!(matches!(err, PrimerError::Config(_)));
    }
}
