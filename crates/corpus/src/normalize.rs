use crate::types::{NormalizedSection, Section};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed corpus name stamped on every normalized section.
pub const SOURCE_NAME: &str = "USPTO TMEP";

/// Body text shorter than this after normalization is non-substantive.
const MIN_TEXT_LEN: usize = 50;

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid pattern"));
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid pattern"));

/// Normalize and validate extracted sections.
///
/// Each input maps to zero or one output: sections whose id collapses to
/// empty or whose body stays under the minimum length are dropped, never
/// patched up. `order` is the zero-based input position so downstream
/// consumers can reconstruct document order after files are interleaved.
#[must_use]
pub fn normalize_sections(sections: Vec<Section>, doc_version: &str) -> Vec<NormalizedSection> {
    let mut normalized = Vec::with_capacity(sections.len());

    for (order, section) in sections.into_iter().enumerate() {
        let section_id = normalize_section_id(&section.section_id);
        if section_id.is_empty() {
            log::debug!("Dropping section with empty id at position {order}");
            continue;
        }

        let title = normalize_title(&section.title);
        let text = normalize_text(&section.raw_text);

        if text.len() < MIN_TEXT_LEN {
            log::debug!("Dropping section {section_id}: body too short after normalization");
            continue;
        }

        let section_path = build_section_path(&section_id, &title);

        normalized.push(NormalizedSection {
            section_id,
            title,
            section_path,
            text,
            source: SOURCE_NAME.to_string(),
            doc_version: doc_version.to_string(),
            order,
        });
    }

    normalized
}

/// Citations must compare byte-for-byte: collapse all whitespace out.
fn normalize_section_id(section_id: &str) -> String {
    WS_RUN_RE.replace_all(section_id.trim(), "").into_owned()
}

/// Collapse internal whitespace runs in the title to single spaces.
fn normalize_title(title: &str) -> String {
    WS_RUN_RE.replace_all(title.trim(), " ").into_owned()
}

/// Normalize non-breaking spaces and collapse blank-line and space runs.
fn normalize_text(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    let text = BLANK_LINES_RE.replace_all(&text, "\n");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    text.trim().to_string()
}

fn build_section_path(section_id: &str, title: &str) -> String {
    format!("{section_id} {title}").trim().to_string()
}
