use crate::artifact::EmbeddedChunk;
use crate::backend::Backend;
use crate::error::{EmbeddingError, Result};
use once_cell::sync::OnceCell;
use tmep_corpus::Chunk;

/// Fixed marker prepended to indexed passage text before encoding.
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Fixed marker prepended to query text before encoding.
pub const QUERY_PREFIX: &str = "query: ";

static SHARED: OnceCell<Embedder> = OnceCell::new();

/// Handle over the process-wide embedding backend.
///
/// Construction selects the backend from the environment; [`Embedder::shared`]
/// guards first use so concurrent callers initialize exactly once and all
/// later calls reuse the same read-only instance.
pub struct Embedder {
    backend: Backend,
}

impl Embedder {
    /// Get the process-wide embedder, initializing it on first use.
    pub fn shared() -> Result<&'static Self> {
        SHARED.get_or_try_init(Self::from_env)
    }

    /// Build an embedder from environment configuration.
    pub fn from_env() -> Result<Self> {
        let backend = Backend::from_env()?;
        log::info!(
            "Embedding backend initialized (dimension {})",
            backend.dimension()
        );
        Ok(Self { backend })
    }

    /// Build a deterministic stub embedder with the given vector width.
    #[must_use]
    pub const fn stub(dimension: usize) -> Self {
        Self {
            backend: Backend::Stub(crate::backend::StubBackend::new(dimension)),
        }
    }

    /// Vector width produced by this backend.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    /// Encode indexed passage text. Applies the fixed passage marker.
    pub async fn encode_passage(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(&format!("{PASSAGE_PREFIX}{text}")).await
    }

    /// Encode query text. Applies the fixed query marker.
    pub async fn encode_query(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(&format!("{QUERY_PREFIX}{text}")).await
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.backend.embed(text).await?;
        let expected = self.backend.dimension();
        if vector.len() != expected {
            return Err(EmbeddingError::InvalidDimension {
                expected,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }
}

/// Embed a batch of chunks with passage-role encoding.
///
/// Chunks with empty text are skipped; everything else maps one-to-one onto
/// an [`EmbeddedChunk`] carrying the exact embedded text for traceability.
pub async fn embed_chunks(embedder: &Embedder, chunks: &[Chunk]) -> Result<Vec<EmbeddedChunk>> {
    let mut embedded = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        if !chunk.has_text() {
            continue;
        }

        let text = chunk.text.trim();
        let vector = embedder.encode_passage(text).await?;
        embedded.push(EmbeddedChunk {
            chunk_id: chunk.chunk_id.clone(),
            section_id: chunk.section_id.clone(),
            section_path: chunk.section_path.clone(),
            source_file: chunk.source_file.clone(),
            embedding: vector,
            text: text.to_string(),
            doc_version: chunk.doc_version.clone(),
            source: chunk.source.clone(),
        });
    }

    log::info!("Embedded {} chunks", embedded.len());
    Ok(embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub_embed;
    use pretty_assertions::assert_eq;

    const DIM: usize = 32;

    #[tokio::test]
    async fn test_passage_role_applies_passage_prefix() {
        let embedder = Embedder::stub(DIM);
        let encoded = embedder.encode_passage("generic terms").await.unwrap();
        assert_eq!(encoded, stub_embed("passage: generic terms", DIM));
    }

    #[tokio::test]
    async fn test_query_role_applies_query_prefix() {
        let embedder = Embedder::stub(DIM);
        let encoded = embedder.encode_query("generic terms").await.unwrap();
        assert_eq!(encoded, stub_embed("query: generic terms", DIM));
    }

    #[tokio::test]
    async fn test_roles_diverge_on_identical_text() {
        let embedder = Embedder::stub(DIM);
        let passage = embedder.encode_passage("same text").await.unwrap();
        let query = embedder.encode_query("same text").await.unwrap();
        assert_ne!(passage, query);
    }

    #[tokio::test]
    async fn test_embed_chunks_skips_empty_text() {
        let embedder = Embedder::stub(DIM);
        let mut chunk = sample_chunk("f.html::301::0");
        chunk.text = "  ".to_string();
        let embedded = embed_chunks(&embedder, &[chunk]).await.unwrap();
        assert!(embedded.is_empty());
    }

    #[tokio::test]
    async fn test_embed_chunks_carries_metadata() {
        let embedder = Embedder::stub(DIM);
        let chunk = sample_chunk("f.html::301::0");
        let embedded = embed_chunks(&embedder, &[chunk.clone()]).await.unwrap();
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].chunk_id, chunk.chunk_id);
        assert_eq!(embedded[0].doc_version, chunk.doc_version);
        assert_eq!(embedded[0].embedding.len(), DIM);
        assert_eq!(embedded[0].text, chunk.text);
    }

    fn sample_chunk(chunk_id: &str) -> Chunk {
        Chunk {
            chunk_id: chunk_id.to_string(),
            section_id: "301".to_string(),
            title: "Filing".to_string(),
            section_path: "301 Filing".to_string(),
            text: "Substantive regulatory text.".to_string(),
            source: "USPTO TMEP".to_string(),
            doc_version: "v1".to_string(),
            order: 0,
            source_file: "f.html".to_string(),
        }
    }
}
