use crate::error::{CorpusError, Result};
use crate::extract::extract_sections;
use crate::normalize::normalize_sections;
use crate::types::{Chunk, NormalizedSection};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Map normalized sections to retrieval chunks for one source file.
///
/// One citable unit = one chunk, deliberately: a citation's authoritative
/// text is never split across chunks and two citations are never merged.
/// Repeated citations within a file are disambiguated by a per-`section_id`
/// occurrence counter, which keeps `chunk_id` reproducible across reruns on
/// unchanged input.
#[must_use]
pub fn assemble_chunks(sections: Vec<NormalizedSection>, source_file: &str) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(sections.len());
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    for section in sections {
        let text = section.text.trim().to_string();
        if text.is_empty() {
            continue;
        }

        let count = occurrences.entry(section.section_id.clone()).or_insert(0);
        let chunk_id = format!("{source_file}::{}::{count}", section.section_id);
        *count += 1;

        chunks.push(Chunk {
            chunk_id,
            section_id: section.section_id,
            title: section.title,
            section_path: section.section_path,
            text,
            source: section.source,
            doc_version: section.doc_version,
            order: section.order,
            source_file: source_file.to_string(),
        });
    }

    chunks
}

/// Run the full extraction pipeline over a directory of TMEP HTML files.
///
/// Files are processed in sorted order so the output is deterministic.
/// `chunk_id` uniqueness is enforced across the entire batch; a collision is
/// a fatal integrity error because it signals an extraction or normalization
/// bug upstream, not a condition to paper over.
pub fn collect_corpus(dir: impl AsRef<Path>, doc_version: &str) -> Result<Vec<Chunk>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(CorpusError::not_found(dir.display().to_string()));
    }

    let mut html_files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
        .collect();
    html_files.sort();

    log::info!("Found {} TMEP HTML files in {}", html_files.len(), dir.display());

    let mut batches = Vec::with_capacity(html_files.len());

    for path in &html_files {
        let source_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        log::info!("Processing {source_file}");

        let sections = extract_sections(path)?;
        let normalized = normalize_sections(sections, doc_version);
        batches.push(assemble_chunks(normalized, &source_file));
    }

    let all_chunks = merge_batches(batches)?;
    log::info!("Total chunks created: {}", all_chunks.len());
    Ok(all_chunks)
}

/// Merge per-file chunk batches, enforcing `chunk_id` uniqueness across the
/// whole set. A collision is fatal, never a dropped record.
fn merge_batches(batches: Vec<Vec<Chunk>>) -> Result<Vec<Chunk>> {
    let mut merged = Vec::with_capacity(batches.iter().map(Vec::len).sum());
    let mut seen_ids: HashSet<String> = HashSet::new();

    for batch in batches {
        for chunk in batch {
            if !seen_ids.insert(chunk.chunk_id.clone()) {
                return Err(CorpusError::duplicate(chunk.chunk_id));
            }
            merged.push(chunk);
        }
    }

    Ok(merged)
}

/// Write the chunk artifact as a JSON array, creating parent directories
/// first and writing the file whole.
pub fn write_chunks(chunks: &[Chunk], output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(chunks)?;
    std::fs::write(output_path, data)?;
    log::info!("Wrote {} chunks to {}", chunks.len(), output_path.display());
    Ok(())
}

/// Read a chunk artifact back from disk.
pub fn read_chunks(path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorpusError::not_found(path.display().to_string()));
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
