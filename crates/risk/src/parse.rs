use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One structured issue extracted from generative output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Description of the legal issue
    pub issue_text: String,

    /// TMEP citation string, `§` stripped
    pub citation: String,

    /// Explanation grounded in the cited section
    pub explanation: String,
}

/// Start of a record: the `ISSUE:` label at the beginning of a line.
/// An explanation block runs until the next such label or end of input;
/// that termination rule is a contract, pinned by tests below.
static RECORD_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*ISSUE:").expect("valid record-start pattern"));

/// Fields within one record. Tolerant by design: case-insensitive labels,
/// optional `§` marker, flexible whitespace around every separator.
static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)^[ \t]*ISSUE:\s*(.*?)\s*TMEP\s*CITATION:\s*§?\s*([0-9a-z().]+)\s*TMEP-BASED\s*EXPLANATION:\s*(.*)$",
    )
    .expect("valid record pattern")
});

/// Extract zero or more issues from generative output text.
///
/// Malformed records (a label block missing its citation or explanation)
/// are skipped rather than failing the whole parse; the generative model is
/// not trusted to produce well-formed output.
#[must_use]
pub fn parse_generated_output(text: &str) -> Vec<Issue> {
    let starts: Vec<usize> = RECORD_START_RE.find_iter(text).map(|m| m.start()).collect();

    let mut issues = Vec::with_capacity(starts.len());

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let record = &text[start..end];

        let Some(caps) = RECORD_RE.captures(record) else {
            log::debug!("Skipping malformed issue record");
            continue;
        };

        issues.push(Issue {
            issue_text: caps[1].trim().to_string(),
            citation: caps[2].trim().to_string(),
            explanation: caps[3].trim().to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_single_well_formed_record() {
        let text = "ISSUE:\nMark is merely descriptive.\n\n\
                    TMEP CITATION:\n§1209.01(b)\n\n\
                    TMEP-BASED EXPLANATION:\nThe mark describes a feature of the goods.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_text, "Mark is merely descriptive.");
        assert_eq!(issues[0].citation, "1209.01(b)");
        assert_eq!(
            issues[0].explanation,
            "The mark describes a feature of the goods."
        );
    }

    #[test]
    fn test_parses_multiple_records() {
        let text = "ISSUE: First issue.\nTMEP CITATION: §1207\nTMEP-BASED EXPLANATION: One.\n\
                    ISSUE: Second issue.\nTMEP CITATION: 904.03\nTMEP-BASED EXPLANATION: Two.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].citation, "1207");
        assert_eq!(issues[1].citation, "904.03");
    }

    #[test]
    fn test_labels_are_case_insensitive_and_symbol_optional() {
        let text = "issue: Lowercase labels.\ntmep citation: 1202.04\n\
                    tmep-based explanation: Still parses.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].citation, "1202.04");
    }

    #[test]
    fn test_explanation_terminates_at_next_record_label() {
        let text = "ISSUE: A.\nTMEP CITATION: 1207\nTMEP-BASED EXPLANATION: Line one.\nLine two.\n\
                    ISSUE: B.\nTMEP CITATION: 1203\nTMEP-BASED EXPLANATION: Other.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].explanation, "Line one.\nLine two.");
    }

    #[test]
    fn test_issue_label_mid_line_does_not_split_record() {
        // Only a line-start ISSUE: label terminates an explanation.
        let text = "ISSUE: A.\nTMEP CITATION: 1207\n\
                    TMEP-BASED EXPLANATION: Raises an ISSUE: of timing.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].explanation, "Raises an ISSUE: of timing.");
    }

    #[test]
    fn test_no_well_formed_records_yields_empty() {
        assert!(parse_generated_output("NO APPLICABLE TMEP PROVISION FOUND.").is_empty());
        assert!(parse_generated_output("").is_empty());
        assert!(parse_generated_output("Some prose without any labels.").is_empty());
    }

    #[test]
    fn test_malformed_record_skipped_not_fatal() {
        let text = "ISSUE: Missing the rest.\n\
                    ISSUE: Complete.\nTMEP CITATION: 1210\nTMEP-BASED EXPLANATION: Ok.";
        let issues = parse_generated_output(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].citation, "1210");
    }
}
