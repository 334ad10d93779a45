use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chunk plus its passage-role embedding, as persisted in the optional
/// intermediate artifact between the embed and load stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk_id: String,
    pub section_id: String,
    pub section_path: String,
    pub source_file: String,
    pub embedding: Vec<f32>,
    /// The exact text that was embedded, kept for legal traceability.
    pub text: String,
    pub doc_version: String,
    pub source: String,
}

/// Write the embedding artifact as a JSON array, creating parent
/// directories first and writing the file whole.
pub fn write_embedded_chunks(chunks: &[EmbeddedChunk], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(chunks)?;
    std::fs::write(path, data)?;
    log::info!("Wrote {} embedded chunks to {}", chunks.len(), path.display());
    Ok(())
}

/// Read an embedding artifact back from disk.
pub fn read_embedded_chunks(path: impl AsRef<Path>) -> Result<Vec<EmbeddedChunk>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EmbeddingError::service(format!(
            "Embeddings file not found: {}",
            path.display()
        )));
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
