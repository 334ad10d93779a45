use crate::error::IndexError;
use crate::schema::VectorIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tmep_embedding::{Embedder, EmbeddingError};

/// Minimum cosine similarity a hit must clear to count as evidence.
pub const MIN_SIMILARITY: f32 = 0.70;

/// Errors and distinct non-error outcomes of a retrieval call.
///
/// `NoEvidence` is a normal business outcome, not a system fault; callers
/// must branch on it separately from transport and index failures.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// No `doc_version` supplied; cross-version search is never permitted
    #[error("doc_version must be provided")]
    MissingDocVersion,

    /// Nothing cleared the similarity gate
    #[error("No sufficiently relevant TMEP sections found")]
    NoEvidence,

    /// Query encoding failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Index-side failure
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// One retrieval hit that cleared the similarity gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub text: String,
    pub section_id: String,
    pub section_path: String,
    pub source_file: String,
    pub doc_version: String,
    pub source: String,
    pub distance: f32,
    /// `max(0, 1 − distance)`, clamped into `[0, 1]`
    pub similarity: f32,
}

/// Version-scoped nearest-neighbor search with a hard relevance gate.
///
/// The query is encoded under the query-role prefix and its dimensionality
/// validated against the index schema before any search runs. Hits are
/// converted to clamped similarities, re-sorted descending (ordering from
/// the underlying index is never trusted as authoritative), and gated at
/// [`MIN_SIMILARITY`]. An empty post-gate set is the explicit
/// [`RetrievalError::NoEvidence`] outcome.
pub async fn retrieve(
    index: &dyn VectorIndex,
    embedder: &Embedder,
    query_text: &str,
    doc_version: &str,
    top_k: usize,
) -> std::result::Result<Vec<RetrievedChunk>, RetrievalError> {
    if doc_version.trim().is_empty() {
        return Err(RetrievalError::MissingDocVersion);
    }

    let query_vector = embedder.encode_query(query_text).await?;

    let schema = index.schema().ok_or(IndexError::SchemaNotInitialized)?;
    if query_vector.len() != schema.dimension {
        return Err(IndexError::DimensionMismatch {
            chunk_id: "<query>".to_string(),
            expected: schema.dimension,
            actual: query_vector.len(),
        }
        .into());
    }

    let hits = index
        .query_by_vector(&query_vector, doc_version, top_k)
        .await?;

    let mut results: Vec<RetrievedChunk> = hits
        .into_iter()
        .map(|hit| {
            let similarity = (1.0 - hit.distance).clamp(0.0, 1.0);
            RetrievedChunk {
                chunk_id: hit.record.chunk_id,
                text: hit.record.text,
                section_id: hit.record.section_id,
                section_path: hit.record.section_path,
                source_file: hit.record.source_file,
                doc_version: hit.record.doc_version,
                source: hit.record.source,
                distance: hit.distance,
                similarity,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.retain(|r| r.similarity >= MIN_SIMILARITY);

    if results.is_empty() {
        return Err(RetrievalError::NoEvidence);
    }

    for r in &results {
        log::debug!("{} | similarity {:.4}", r.section_id, r.similarity);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalIndex;
    use crate::schema::{IndexHit, IndexSchema, IndexedRecord};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    const DIM: usize = 32;

    /// Index double that replays scripted hits in a fixed (untrusted) order.
    struct ScriptedIndex {
        schema: IndexSchema,
        hits: Vec<IndexHit>,
    }

    #[async_trait]
    impl VectorIndex for ScriptedIndex {
        async fn ensure_schema(&mut self, _schema: &IndexSchema) -> crate::Result<()> {
            Ok(())
        }

        fn schema(&self) -> Option<&IndexSchema> {
            Some(&self.schema)
        }

        async fn upsert(&mut self, _record: IndexedRecord) -> crate::Result<()> {
            Ok(())
        }

        async fn query_by_vector(
            &self,
            _vector: &[f32],
            doc_version: &str,
            _top_k: usize,
        ) -> crate::Result<Vec<IndexHit>> {
            Ok(self
                .hits
                .iter()
                .filter(|h| h.record.doc_version == doc_version)
                .cloned()
                .collect())
        }
    }

    fn hit(chunk_id: &str, doc_version: &str, distance: f32) -> IndexHit {
        IndexHit {
            record: IndexedRecord {
                id: IndexedRecord::identity(chunk_id),
                chunk_id: chunk_id.to_string(),
                text: "body".to_string(),
                section_id: "301".to_string(),
                section_path: "301 Filing".to_string(),
                source_file: "f.html".to_string(),
                doc_version: doc_version.to_string(),
                source: "USPTO TMEP".to_string(),
                vector: vec![0.0; DIM],
            },
            distance,
        }
    }

    fn scripted(hits: Vec<IndexHit>) -> ScriptedIndex {
        ScriptedIndex {
            schema: IndexSchema::tmep(DIM),
            hits,
        }
    }

    #[tokio::test]
    async fn test_missing_doc_version_rejected_before_search() {
        let index = scripted(vec![]);
        let embedder = Embedder::stub(DIM);
        let err = retrieve(&index, &embedder, "query", "  ", 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::MissingDocVersion));
    }

    #[tokio::test]
    async fn test_results_resorted_and_clamped() {
        // Scripted order is worst-first; distance slightly above 1 must
        // clamp to similarity 0 rather than go negative.
        let index = scripted(vec![
            hit("a", "v1", 0.25),
            hit("b", "v1", 0.05),
            hit("c", "v1", 1.02),
        ]);
        let embedder = Embedder::stub(DIM);
        let results = retrieve(&index, &embedder, "query", "v1", 5).await.unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.similarity)));
        assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[tokio::test]
    async fn test_below_gate_is_no_evidence_not_empty_success() {
        let index = scripted(vec![hit("a", "v1", 0.5), hit("b", "v1", 0.9)]);
        let embedder = Embedder::stub(DIM);
        let err = retrieve(&index, &embedder, "query", "v1", 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NoEvidence));
    }

    #[tokio::test]
    async fn test_version_isolation() {
        let index = scripted(vec![hit("v2-chunk", "V2", 0.01)]);
        let embedder = Embedder::stub(DIM);
        let err = retrieve(&index, &embedder, "query", "V1", 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NoEvidence));
    }

    #[tokio::test]
    async fn test_end_to_end_against_local_index() {
        let mut index = LocalIndex::new();
        index.ensure_schema(&IndexSchema::tmep(DIM)).await.unwrap();

        let embedder = Embedder::stub(DIM);
        // Store the query-role vector itself so the stored record is an
        // exact self-match for the query under the stub backend.
        let query = "likelihood of confusion between marks";
        let stored_vec = embedder.encode_query(query).await.unwrap();

        index
            .upsert(IndexedRecord {
                id: IndexedRecord::identity("a.html::1207::0"),
                chunk_id: "a.html::1207::0".to_string(),
                text: "confusion text".to_string(),
                section_id: "1207".to_string(),
                section_path: "1207 Likelihood of Confusion".to_string(),
                source_file: "a.html".to_string(),
                doc_version: "v1".to_string(),
                source: "USPTO TMEP".to_string(),
                vector: stored_vec,
            })
            .await
            .unwrap();

        let results = retrieve(&index, &embedder, query, "v1", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].similarity - 1.0).abs() < 1e-5);

        // Passage-role encoding of the same text must differ: had retrieval
        // used the wrong prefix, this self-match would not have been exact.
        let passage_vec = embedder.encode_passage(query).await.unwrap();
        let query_vec = embedder.encode_query(query).await.unwrap();
        assert_ne!(passage_vec, query_vec);
    }
}
