use crate::error::{IndexError, Result};
use crate::schema::{IndexHit, IndexSchema, IndexedRecord, VectorIndex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// In-process vector index: brute-force cosine search over records kept in
/// memory, persisted as JSON. Stands in for the external nearest-neighbor
/// service behind the [`VectorIndex`] trait.
pub struct LocalIndex {
    schema: Option<IndexSchema>,
    records: HashMap<Uuid, IndexedRecord>,
    path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    schema: IndexSchema,
    records: Vec<IndexedRecord>,
}

impl LocalIndex {
    /// Create an empty in-memory index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: None,
            records: HashMap::new(),
            path: None,
        }
    }

    /// Create an index persisted at the given path.
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            schema: None,
            records: HashMap::new(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Load a persisted index from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let persisted: PersistedIndex = serde_json::from_str(&data)?;

        let records = persisted
            .records
            .into_iter()
            .map(|r| (r.id, r))
            .collect::<HashMap<_, _>>();

        log::info!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            schema: Some(persisted.schema),
            records,
            path: Some(path.to_path_buf()),
        })
    }

    /// Persist the index if a path is configured.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let schema = self
            .schema
            .clone()
            .ok_or(IndexError::SchemaNotInitialized)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut records: Vec<_> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.chunk_id.cmp(&b.chunk_id));

        let data = serde_json::to_string(&PersistedIndex { schema, records })?;
        std::fs::write(path, data)?;
        log::info!("Saved {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Number of records in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        1.0 - Self::cosine_similarity(a, b)
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

impl Default for LocalIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for LocalIndex {
    async fn ensure_schema(&mut self, schema: &IndexSchema) -> Result<()> {
        match &self.schema {
            None => {
                log::info!(
                    "Creating collection '{}' ({}, dim {})",
                    schema.collection,
                    schema.distance.as_str(),
                    schema.dimension
                );
                self.schema = Some(schema.clone());
                Ok(())
            }
            Some(existing) => {
                if existing.distance != schema.distance {
                    return Err(IndexError::schema_mismatch(format!(
                        "distance metric is {}, expected {}",
                        existing.distance.as_str(),
                        schema.distance.as_str()
                    )));
                }
                if existing.dimension != schema.dimension {
                    return Err(IndexError::schema_mismatch(format!(
                        "dimension is {}, expected {}",
                        existing.dimension, schema.dimension
                    )));
                }
                Ok(())
            }
        }
    }

    fn schema(&self) -> Option<&IndexSchema> {
        self.schema.as_ref()
    }

    async fn upsert(&mut self, record: IndexedRecord) -> Result<()> {
        let schema = self
            .schema
            .as_ref()
            .ok_or(IndexError::SchemaNotInitialized)?;
        if record.vector.len() != schema.dimension {
            return Err(IndexError::DimensionMismatch {
                chunk_id: record.chunk_id,
                expected: schema.dimension,
                actual: record.vector.len(),
            });
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn query_by_vector(
        &self,
        vector: &[f32],
        doc_version: &str,
        top_k: usize,
    ) -> Result<Vec<IndexHit>> {
        let schema = self
            .schema
            .as_ref()
            .ok_or(IndexError::SchemaNotInitialized)?;
        if vector.len() != schema.dimension {
            return Err(IndexError::DimensionMismatch {
                chunk_id: "<query>".to_string(),
                expected: schema.dimension,
                actual: vector.len(),
            });
        }

        let mut hits: Vec<IndexHit> = self
            .records
            .values()
            .filter(|r| r.doc_version == doc_version)
            .map(|r| IndexHit {
                distance: Self::cosine_distance(vector, &r.vector),
                record: r.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(chunk_id: &str, doc_version: &str, vector: Vec<f32>) -> IndexedRecord {
        IndexedRecord {
            id: IndexedRecord::identity(chunk_id),
            chunk_id: chunk_id.to_string(),
            text: "body".to_string(),
            section_id: "301".to_string(),
            section_path: "301 Filing".to_string(),
            source_file: "f.html".to_string(),
            doc_version: doc_version.to_string(),
            source: "USPTO TMEP".to_string(),
            vector,
        }
    }

    #[tokio::test]
    async fn test_schema_create_then_validate() {
        let mut index = LocalIndex::new();
        let schema = IndexSchema::tmep(3);
        index.ensure_schema(&schema).await.unwrap();
        index.ensure_schema(&schema).await.unwrap();

        let wrong_dim = IndexSchema::tmep(4);
        let err = index.ensure_schema(&wrong_dim).await.unwrap_err();
        assert!(matches!(err, IndexError::SchemaMismatch(_)));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_identity() {
        let mut index = LocalIndex::new();
        index.ensure_schema(&IndexSchema::tmep(3)).await.unwrap();

        index
            .upsert(record("f.html::301::0", "v1", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        index
            .upsert(record("f.html::301::0", "v1", vec![0.0, 1.0, 0.0]))
            .await
            .unwrap();

        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn test_doc_version_filter_is_hard_isolation() {
        let mut index = LocalIndex::new();
        index.ensure_schema(&IndexSchema::tmep(3)).await.unwrap();
        index
            .upsert(record("a.html::301::0", "V1", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        index
            .upsert(record("b.html::301::0", "V2", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();

        let hits = index
            .query_by_vector(&[1.0, 0.0, 0.0], "V1", 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.doc_version, "V1");
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let mut index = LocalIndex::new();
        index.ensure_schema(&IndexSchema::tmep(3)).await.unwrap();
        let err = index
            .query_by_vector(&[1.0, 0.0], "v1", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let mut index = LocalIndex::with_path(&path);
        index.ensure_schema(&IndexSchema::tmep(3)).await.unwrap();
        index
            .upsert(record("f.html::301::0", "v1", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        index.save().unwrap();

        let loaded = LocalIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.schema(), Some(&IndexSchema::tmep(3)));
    }
}
