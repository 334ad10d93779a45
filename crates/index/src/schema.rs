use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distance metric of the vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    Cosine,
}

impl DistanceMetric {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
        }
    }
}

/// Collection schema: the contract an existing index must match exactly
/// before it may be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Collection name
    pub collection: String,

    /// Distance metric of the vector space
    pub distance: DistanceMetric,

    /// Fixed vector width
    pub dimension: usize,
}

impl IndexSchema {
    /// Default schema for the TMEP chunk collection.
    #[must_use]
    pub fn tmep(dimension: usize) -> Self {
        Self {
            collection: "TmepChunk".to_string(),
            distance: DistanceMetric::Cosine,
            dimension,
        }
    }
}

/// One persisted vector-index record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    /// Deterministic identity: uuid-v5 of `chunk_id`. Re-ingesting the same
    /// chunk overwrites in place instead of duplicating.
    pub id: Uuid,
    pub chunk_id: String,
    pub text: String,
    pub section_id: String,
    pub section_path: String,
    pub source_file: String,
    pub doc_version: String,
    pub source: String,
    pub vector: Vec<f32>,
}

impl IndexedRecord {
    /// Derive the deterministic index identity for a chunk id.
    #[must_use]
    pub fn identity(chunk_id: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_DNS, chunk_id.as_bytes())
    }
}

/// One raw nearest-neighbor hit with its distance metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub record: IndexedRecord,
    pub distance: f32,
}

/// Black-box boundary to the nearest-neighbor service.
///
/// Implementations own storage and search internals; callers only rely on
/// create-or-validate schema semantics, upsert-by-identity, and filtered
/// vector queries returning distance metadata.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection on first use, or validate that the existing
    /// collection's metric and dimensionality match exactly.
    async fn ensure_schema(&mut self, schema: &IndexSchema) -> Result<()>;

    /// The schema currently backing this index, if created.
    fn schema(&self) -> Option<&IndexSchema>;

    /// Insert or overwrite one record keyed by its deterministic identity.
    async fn upsert(&mut self, record: IndexedRecord) -> Result<()>;

    /// Nearest-neighbor query restricted by a `doc_version` equality filter.
    /// Ordering of the returned hits is not authoritative.
    async fn query_by_vector(
        &self,
        vector: &[f32],
        doc_version: &str,
        top_k: usize,
    ) -> Result<Vec<IndexHit>>;
}
