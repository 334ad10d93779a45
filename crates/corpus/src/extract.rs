use crate::error::{CorpusError, Result};
use crate::types::Section;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// Containers with less body text than this are navigation or boilerplate.
const MIN_RAW_TEXT_LEN: usize = 80;

/// Citation heading grammar: dot-separated numeric groups, optionally
/// suffixed with parenthesized alphanumeric sub-identifiers, then a title.
/// `301.01(a) Receipt of Documents` parses; `Chapter 300` does not.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)*(?:\([a-z0-9]+\))*)\s+(.*)$")
        .expect("valid heading grammar")
});

static SECTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.Section").expect("valid section selector"));

static PAGE_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.page-title").expect("valid page-title selector"));

/// Extract atomic legal units from a TMEP HTML file.
///
/// Fails with [`CorpusError::DocumentNotFound`] if the file does not exist.
pub fn extract_sections(path: impl AsRef<Path>) -> Result<Vec<Section>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorpusError::not_found(path.display().to_string()));
    }
    let html = std::fs::read_to_string(path)?;
    Ok(extract_sections_from_html(&html))
}

/// Extract atomic legal units from an in-memory HTML document.
///
/// Every `div.Section` container is visited, nested ones included: a parent
/// wrapper and its child subsections are each candidates in their own right.
/// Containers are discarded when headless, when the heading does not parse
/// under the citation grammar (uncitable text cannot ground evidence), or
/// when the body falls below the minimum content length.
#[must_use]
pub fn extract_sections_from_html(html: &str) -> Vec<Section> {
    let document = Html::parse_document(html);
    let mut sections = Vec::new();

    for container in document.select(&SECTION_SELECTOR) {
        let heading = resolve_heading(&container);
        let Some((section_id, title)) = split_heading(&heading) else {
            log::debug!("Skipping unidentifiable container: {heading:?}");
            continue;
        };

        let raw_text = collect_body(&container);
        if raw_text.len() < MIN_RAW_TEXT_LEN {
            log::debug!("Skipping short section {section_id} ({} chars)", raw_text.len());
            continue;
        }

        sections.push(Section::new(section_id, title, raw_text));
    }

    sections
}

/// Heading resolution policy: the last `h1.page-title` inside the container
/// is the most authoritative; otherwise the first `h2`/`h3`/`h4` found;
/// otherwise the container is headless and the empty string is returned.
fn resolve_heading(container: &ElementRef<'_>) -> String {
    if let Some(h1) = container.select(&PAGE_TITLE_SELECTOR).last() {
        return element_text(&h1);
    }

    for tag in ["h2", "h3", "h4"] {
        let selector = Selector::parse(tag).expect("valid heading selector");
        if let Some(h) = container.select(&selector).next() {
            return element_text(&h);
        }
    }

    String::new()
}

/// Split a heading into `(section_id, title)` under the citation grammar.
fn split_heading(heading: &str) -> Option<(String, String)> {
    let caps = HEADING_RE.captures(heading)?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

/// Concatenate the text of the container's direct `p`/`li` children, joined
/// by newlines. Only direct children are read so that a parent section never
/// duplicates the body of a nested child section.
fn collect_body(container: &ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for child in container.children() {
        let Some(el) = ElementRef::wrap(child) else {
            continue;
        };
        if matches!(el.value().name(), "p" | "li") {
            let text = element_text(&el);
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }

    parts.join("\n")
}

/// Collect an element's text content with whitespace runs squeezed to single
/// spaces and the result trimmed.
fn element_text(el: &ElementRef<'_>) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(joined.len());
    let mut last_was_space = true;
    for ch in joined.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim_end().to_string()
}
