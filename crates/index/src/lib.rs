//! # TMEP Index
//!
//! Vector-index lifecycle and version-isolated similarity search.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddedChunk[]
//!     │
//!     ├──> Index Manager (load)
//!     │      ├─> batch validation: non-empty, single doc_version,
//!     │      │   per-item dimension check
//!     │      └─> idempotent upsert (uuid-v5 of chunk_id)
//!     │
//!     └──> Retrieval Engine (retrieve)
//!            ├─> query-role encoding + dimension check
//!            ├─> doc_version equality filter (hard isolation)
//!            └─> clamp, re-sort, similarity gate → RetrievedChunk[]
//! ```
//!
//! The nearest-neighbor service itself is a black box behind the
//! [`VectorIndex`] trait; [`LocalIndex`] is the in-process implementation.

mod error;
mod local;
mod manager;
mod retrieval;
mod schema;

pub use error::{IndexError, Result};
pub use local::LocalIndex;
pub use manager::load_batch;
pub use retrieval::{retrieve, RetrievalError, RetrievedChunk, MIN_SIMILARITY};
pub use schema::{DistanceMetric, IndexHit, IndexSchema, IndexedRecord, VectorIndex};
