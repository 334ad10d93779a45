use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Risk tier assigned to an identified issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    MediumHigh,
    Medium,
    MediumLow,
    Low,
}

impl RiskTier {
    /// Tier used when no prefix rule matches a citation. Deliberately the
    /// middle of the scale: an unknown section is neither escalated to the
    /// most severe tier nor silently dropped.
    pub const DEFAULT: Self = Self::Medium;

    /// Report label for this tier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::MediumHigh => "MEDIUM-HIGH",
            Self::Medium => "MEDIUM",
            Self::MediumLow => "MEDIUM-LOW",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curated citation-prefix → tier table.
///
/// The 1209.01(c) entry is a deliberate specific override nested inside the
/// broader 1209 MEDIUM-HIGH range; longest-prefix-wins resolves it to HIGH.
/// Do not reconcile apparent overlaps here without domain sign-off.
const RISK_MAPPING: &[(RiskTier, &[&str])] = &[
    (
        RiskTier::High,
        &["1207", "1203", "1210", "1211", "1206", "1204", "1209.01(c)"],
    ),
    (
        RiskTier::MediumHigh,
        &["1209", "1202", "1202.04", "1301", "1302", "1303", "1304", "1212"],
    ),
    (RiskTier::Medium, &["904", "807", "1213", "1402"]),
    (RiskTier::MediumLow, &["300", "400", "600", "700"]),
    (RiskTier::Low, &["100", "200", "304", "500"]),
];

/// Prefix rules flattened and sorted longest-first, computed once.
static SORTED_RULES: Lazy<Vec<(RiskTier, String)>> = Lazy::new(|| {
    let mut rules: Vec<(RiskTier, String)> = RISK_MAPPING
        .iter()
        .flat_map(|(tier, prefixes)| {
            prefixes
                .iter()
                .map(move |prefix| (*tier, prefix.to_ascii_lowercase()))
        })
        .collect();
    rules.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    rules
});

/// Determine the risk tier for a TMEP citation.
///
/// The citation is lowercased and trimmed, then matched against the curated
/// prefix table with longest-prefix-wins semantics. No match yields
/// [`RiskTier::DEFAULT`].
#[must_use]
pub fn classify_section(section_id: &str) -> RiskTier {
    let section_id = section_id.trim().to_ascii_lowercase();

    for (tier, prefix) in SORTED_RULES.iter() {
        if section_id.starts_with(prefix.as_str()) {
            return *tier;
        }
    }

    RiskTier::DEFAULT
}
