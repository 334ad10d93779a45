use thiserror::Error;

/// Result type for corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Errors that can occur while building the corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Input document does not exist
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Two chunks in one ingestion batch resolved to the same identity.
    /// Signals an extraction or normalization bug, never skipped.
    #[error("Duplicate chunk_id detected: {0}")]
    DuplicateChunkId(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl CorpusError {
    /// Create a not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::DocumentNotFound(path.into())
    }

    /// Create a duplicate-identity error
    pub fn duplicate(chunk_id: impl Into<String>) -> Self {
        Self::DuplicateChunkId(chunk_id.into())
    }
}
