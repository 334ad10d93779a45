//! # TMEP Corpus
//!
//! Deterministic extraction of atomic legal units from TMEP HTML and their
//! assembly into citation-addressable retrieval chunks.
//!
//! ## Pipeline
//!
//! ```text
//! TMEP HTML files
//!     │
//!     ├──> Section Extractor (div.Section traversal, heading grammar)
//!     │
//!     ├──> Section Normalizer (whitespace canonicalization, validation)
//!     │
//!     └──> Chunk Assembler (one citable unit = one chunk)
//!          └─> Chunk[] with globally unique, reproducible chunk_id
//! ```
//!
//! The chunk identity contract is the backbone of the whole system:
//! `chunk_id = "{source_file}::{section_id}::{occurrence}"` is byte-identical
//! across reruns on unchanged input, and a collision inside one ingestion
//! batch is a fatal integrity error rather than a skipped record.

mod chunk;
mod error;
mod extract;
mod normalize;
mod types;

pub use chunk::{assemble_chunks, collect_corpus, read_chunks, write_chunks};
pub use error::{CorpusError, Result};
pub use extract::extract_sections;
pub use normalize::{normalize_sections, SOURCE_NAME};
pub use types::{Chunk, NormalizedSection, Section};
