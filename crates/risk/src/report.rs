use crate::classify::classify_section;
use crate::parse::parse_generated_output;
use std::collections::HashSet;

/// Canonical sentinel emitted when no valid issue survives the pipeline.
pub const NO_PROVISION_FOUND: &str = "NO APPLICABLE TMEP PROVISION FOUND.";

/// Fixed legal disclaimer, always the final block of a rendered report.
pub const DISCLAIMER: &str = "Disclaimer: This assessment is generated for research and \
                              decision-support purposes only. It is not legal advice.";

/// Convert generative output into the final risk-assigned report.
///
/// When `retrieved_citations` is supplied, any issue citing a section not
/// (case-insensitively) present in that set is discarded: the generative
/// step must not introduce citations that were never retrieved as evidence.
/// Zero parsed issues, or zero surviving validation, yields the sentinel.
#[must_use]
pub fn apply_risk_engine(generated_text: &str, retrieved_citations: Option<&[String]>) -> String {
    let mut issues = parse_generated_output(generated_text);

    if issues.is_empty() {
        return NO_PROVISION_FOUND.to_string();
    }

    if let Some(retrieved) = retrieved_citations {
        let normalized: HashSet<String> = retrieved
            .iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .collect();

        let before = issues.len();
        issues.retain(|issue| normalized.contains(&issue.citation.trim().to_ascii_lowercase()));
        if issues.len() < before {
            log::debug!(
                "Discarded {} issue(s) citing unretrieved sections",
                before - issues.len()
            );
        }

        if issues.is_empty() {
            return NO_PROVISION_FOUND.to_string();
        }
    }

    let mut blocks: Vec<String> = Vec::with_capacity(issues.len() + 1);

    for issue in &issues {
        let tier = classify_section(&issue.citation);
        blocks.push(format!(
            "RISK CATEGORY: {tier}\n\n\
             ISSUE:\n{}\n\n\
             TMEP CITATION:\n§{}\n\n\
             REASONING:\n{}\n",
            issue.issue_text, issue.citation, issue.explanation
        ));
    }

    blocks.push(DISCLAIMER.to_string());
    blocks.join("\n")
}
