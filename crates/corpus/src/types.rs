use serde::{Deserialize, Serialize};

/// One atomic citable unit as extracted from the manual, before any cleanup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// Citation string, e.g. `301.01(a)`
    pub section_id: String,

    /// Heading title with the citation stripped
    pub title: String,

    /// Concatenated body text of the container's direct paragraphs
    pub raw_text: String,
}

impl Section {
    /// Create a new extracted section
    #[must_use]
    pub fn new(
        section_id: impl Into<String>,
        title: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            title: title.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// A validated, canonicalized section ready for chunk assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedSection {
    /// Citation string with all whitespace collapsed out
    pub section_id: String,

    /// Title with internal whitespace runs collapsed
    pub title: String,

    /// Canonical display string: `"{section_id} {title}"`
    pub section_path: String,

    /// Whitespace-normalized body text
    pub text: String,

    /// Fixed corpus name
    pub source: String,

    /// Manual edition label, fixed per ingestion run
    pub doc_version: String,

    /// Zero-based position in the input sequence. Preserved so document
    /// order can be reconstructed even when ingestion interleaves files.
    pub order: usize,
}

/// The retrievable unit: one citable section body plus its identity and
/// citation metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Globally unique, deterministic identity:
    /// `"{source_file}::{section_id}::{occurrence}"`
    pub chunk_id: String,

    /// Legal identity: the citation string
    pub section_id: String,

    /// Section title
    pub title: String,

    /// Citation + title display string
    pub section_path: String,

    /// The chunk's text body
    pub text: String,

    /// Fixed corpus name
    pub source: String,

    /// Manual edition label
    pub doc_version: String,

    /// Document position inherited from the normalized section
    pub order: usize,

    /// File the section was extracted from
    pub source_file: String,
}

impl Chunk {
    /// Check whether this chunk carries any body text
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_new() {
        let section = Section::new("301.01(a)", "Receipt of Documents", "body");
        assert_eq!(section.section_id, "301.01(a)");
        assert_eq!(section.title, "Receipt of Documents");
        assert_eq!(section.raw_text, "body");
    }

    #[test]
    fn test_chunk_has_text() {
        let chunk = Chunk {
            chunk_id: "f.html::301::0".to_string(),
            section_id: "301".to_string(),
            title: String::new(),
            section_path: "301".to_string(),
            text: "   ".to_string(),
            source: "USPTO TMEP".to_string(),
            doc_version: "v1".to_string(),
            order: 0,
            source_file: "f.html".to_string(),
        };
        assert!(!chunk.has_text());
    }
}
