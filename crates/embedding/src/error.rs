use thiserror::Error;

/// Result type for embedding operations
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while encoding text
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The embedding service call failed
    #[error("Embedding service error: {0}")]
    ServiceError(String),

    /// The backend returned a vector of the wrong width
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Unsupported backend mode configuration
    #[error("Unsupported embedding mode '{0}' (expected 'http' or 'stub')")]
    UnsupportedMode(String),

    /// Missing required configuration
    #[error("Missing embedding configuration: {0}")]
    MissingConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl EmbeddingError {
    /// Create a service error
    pub fn service(msg: impl Into<String>) -> Self {
        Self::ServiceError(msg.into())
    }
}
