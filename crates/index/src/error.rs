use thiserror::Error;

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while managing the vector index
#[derive(Error, Debug)]
pub enum IndexError {
    /// Existing collection does not match the expected schema.
    /// Prevents silently mixing incompatible indexes.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The schema has not been created yet
    #[error("Index schema not initialized")]
    SchemaNotInitialized,

    /// Ingestion was handed nothing to ingest
    #[error("Empty ingestion batch")]
    EmptyBatch,

    /// A record's vector width does not match the index
    #[error("Embedding dimension mismatch for chunk {chunk_id}: expected {expected}, got {actual}")]
    DimensionMismatch {
        chunk_id: String,
        expected: usize,
        actual: usize,
    },

    /// One ingestion batch carried more than one manual edition.
    /// Legal isolation forbids mixing versions in a single run.
    #[error("Multiple doc_version values in one batch: {0:?}")]
    MixedDocVersions(Vec<String>),

    /// Some objects failed to persist; ingestion is all-or-nothing
    #[error("Batch ingestion failed for {failed} objects")]
    BatchFailed { failed: usize },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic index-service error
    #[error("Index error: {0}")]
    Other(String),
}

impl IndexError {
    /// Create a schema mismatch error
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }
}
