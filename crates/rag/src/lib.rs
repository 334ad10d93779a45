//! # TMEP RAG
//!
//! Query-time orchestration: turn a structured trademark application record
//! into deterministic query text, retrieve version-scoped evidence, assemble
//! a bounded grounding context, invoke the generative capability under a
//! hard wall-clock timeout, and hand the raw output to the risk engine.
//!
//! ## Failure posture
//!
//! This layer sits at an information-disclosure boundary for a legal-facing
//! system. Generative-call timeouts and failures are recovered locally into
//! fixed user-safe messages; raw error detail is logged and never surfaced.
//! The no-evidence retrieval outcome propagates as its own variant so the
//! API layer above can branch on it distinctly from system faults.

mod context;
mod error;
mod generative;
mod pipeline;
mod prompt;
mod record;

pub use context::{build_context, MAX_CHUNK_CHARS};
pub use error::{RagError, Result};
pub use generative::{GenerationRequest, GenerativeClient, HttpGenerativeClient};
pub use pipeline::{
    generate_assessment, AnalysisOptions, GENERATION_ERROR_MESSAGE, TIMEOUT_MESSAGE,
};
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};
pub use record::{record_to_query, ApplicationRecord, GoodsClass, NOT_PROVIDED};
