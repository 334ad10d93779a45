use thiserror::Error;
use tmep_index::RetrievalError;

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors and distinct outcomes of the analysis pipeline
#[derive(Error, Debug)]
pub enum RagError {
    /// Retrieval found nothing above the similarity gate. A normal business
    /// outcome the caller renders as the no-provision sentinel, distinct
    /// from system faults.
    #[error("No sufficiently relevant TMEP sections found")]
    NoEvidence,

    /// Retrieval failed for a reason other than lack of evidence
    #[error(transparent)]
    Retrieval(RetrievalError),

    /// Generative-client configuration or invocation error
    #[error("Generative client error: {0}")]
    Generative(String),
}

impl From<RetrievalError> for RagError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::NoEvidence => Self::NoEvidence,
            other => Self::Retrieval(other),
        }
    }
}
