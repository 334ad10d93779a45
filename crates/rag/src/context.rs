use tmep_index::RetrievedChunk;

/// Per-chunk character budget in the grounding context. Long source
/// passages must not blow up the prompt.
pub const MAX_CHUNK_CHARS: usize = 1000;

/// Build the grounding context string from retrieved chunks.
///
/// Each chunk renders as a stable labeled block carrying its `section_path`
/// so every generative citation is traceable back to a retrieved source.
#[must_use]
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    let blocks: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[Source {n}]\nSection: {path}\nText: {text}\n",
                n = i + 1,
                path = chunk.section_path,
                text = truncate_chars(&chunk.text, MAX_CHUNK_CHARS),
            )
        })
        .collect();

    blocks.join("\n")
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
