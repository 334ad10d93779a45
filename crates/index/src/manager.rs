use crate::error::{IndexError, Result};
use crate::schema::{IndexSchema, IndexedRecord, VectorIndex};
use std::collections::BTreeSet;
use tmep_embedding::EmbeddedChunk;

/// Validated, idempotent batch ingestion.
///
/// The batch is checked before anything touches the index: it must be
/// non-empty, every vector must have the schema's dimensionality (the first
/// offender is reported by `chunk_id`), and all records must carry the same
/// `doc_version`. Records are then upserted under a uuid-v5 identity derived
/// from `chunk_id`, so re-running ingestion on the same chunk set overwrites
/// in place. Per-record persistence failures are counted and raised as one
/// aggregate error after the batch: ingestion is all-or-nothing from the
/// caller's perspective, never silently partial.
pub async fn load_batch(
    index: &mut dyn VectorIndex,
    schema: &IndexSchema,
    batch: &[EmbeddedChunk],
) -> Result<()> {
    if batch.is_empty() {
        return Err(IndexError::EmptyBatch);
    }

    for item in batch {
        if item.embedding.len() != schema.dimension {
            return Err(IndexError::DimensionMismatch {
                chunk_id: item.chunk_id.clone(),
                expected: schema.dimension,
                actual: item.embedding.len(),
            });
        }
    }

    let doc_versions: BTreeSet<&str> = batch.iter().map(|c| c.doc_version.as_str()).collect();
    if doc_versions.len() != 1 {
        return Err(IndexError::MixedDocVersions(
            doc_versions.into_iter().map(String::from).collect(),
        ));
    }

    index.ensure_schema(schema).await?;

    log::info!("Ingesting {} chunks into '{}'", batch.len(), schema.collection);

    let mut failed = 0usize;
    for item in batch {
        let record = IndexedRecord {
            id: IndexedRecord::identity(&item.chunk_id),
            chunk_id: item.chunk_id.clone(),
            text: item.text.clone(),
            section_id: item.section_id.clone(),
            section_path: item.section_path.clone(),
            source_file: item.source_file.clone(),
            doc_version: item.doc_version.clone(),
            source: item.source.clone(),
            vector: item.embedding.clone(),
        };

        if let Err(e) = index.upsert(record).await {
            log::error!("Failed to persist chunk {}: {e}", item.chunk_id);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(IndexError::BatchFailed { failed });
    }

    log::info!(
        "Ingested {} chunks (doc_version {:?})",
        batch.len(),
        batch[0].doc_version
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalIndex;
    use pretty_assertions::assert_eq;

    fn embedded(chunk_id: &str, doc_version: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk_id: chunk_id.to_string(),
            section_id: "301".to_string(),
            section_path: "301 Filing".to_string(),
            source_file: "f.html".to_string(),
            embedding,
            text: "body".to_string(),
            doc_version: doc_version.to_string(),
            source: "USPTO TMEP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let mut index = LocalIndex::new();
        let err = load_batch(&mut index, &IndexSchema::tmep(3), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_names_offending_chunk() {
        let mut index = LocalIndex::new();
        let batch = vec![
            embedded("a.html::301::0", "v1", vec![1.0, 0.0, 0.0]),
            embedded("a.html::302::0", "v1", vec![1.0, 0.0]),
        ];
        let err = load_batch(&mut index, &IndexSchema::tmep(3), &batch)
            .await
            .unwrap_err();
        match err {
            IndexError::DimensionMismatch {
                chunk_id,
                expected,
                actual,
            } => {
                assert_eq!(chunk_id, "a.html::302::0");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_mixed_doc_versions_fatal() {
        let mut index = LocalIndex::new();
        let batch = vec![
            embedded("a.html::301::0", "V1", vec![1.0, 0.0, 0.0]),
            embedded("a.html::302::0", "V2", vec![1.0, 0.0, 0.0]),
        ];
        let err = load_batch(&mut index, &IndexSchema::tmep(3), &batch)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::MixedDocVersions(_)));
        // Nothing was ingested: validation happens before any upsert.
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_reingestion_is_idempotent() {
        let mut index = LocalIndex::new();
        let batch = vec![
            embedded("a.html::301::0", "v1", vec![1.0, 0.0, 0.0]),
            embedded("a.html::302::0", "v1", vec![0.0, 1.0, 0.0]),
        ];
        load_batch(&mut index, &IndexSchema::tmep(3), &batch)
            .await
            .unwrap();
        load_batch(&mut index, &IndexSchema::tmep(3), &batch)
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
    }
}
