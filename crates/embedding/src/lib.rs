//! # TMEP Embedding
//!
//! Embedding Adapter over a black-box text-embedding capability.
//!
//! Two contracts live here and both are load-bearing:
//!
//! - **Asymmetric encoding**: indexed passage text is prefixed with
//!   `"passage: "` and query text with `"query: "` before encoding. The
//!   underlying E5-family model was trained on exactly these markers;
//!   swapping them degrades relevance silently, so the prefixes are fixed
//!   constants and tests pin them per call-site role.
//! - **Single shared handle**: the backend is initialized exactly once per
//!   process, lazily on first use, and is read-only afterwards, so it is
//!   safe to reuse across concurrent requests without locking.

mod artifact;
mod backend;
mod embedder;
mod error;

pub use artifact::{read_embedded_chunks, write_embedded_chunks, EmbeddedChunk};
pub use embedder::{embed_chunks, Embedder, PASSAGE_PREFIX, QUERY_PREFIX};
pub use error::{EmbeddingError, Result};
