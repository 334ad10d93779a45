use serde::{Deserialize, Serialize};

/// Explicit marker substituted for absent record fields. Input-malformed
/// fields are never silently defaulted to empty strings; the marker keeps
/// the query text deterministic and visible to the generative step.
pub const NOT_PROVIDED: &str = "Not Provided";

/// Structured trademark application record as received from the API layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub mark_info: MarkInfo,

    #[serde(default)]
    pub filing_basis: FilingBasis,

    #[serde(default)]
    pub goods_and_services: Vec<GoodsClass>,

    #[serde(default)]
    pub owner: Owner,

    #[serde(default)]
    pub identifiers: Identifiers,

    #[serde(default)]
    pub dates: Dates,

    #[serde(default)]
    pub mark_features: MarkFeatures,

    #[serde(default)]
    pub disclaimer: Disclaimer,

    #[serde(default)]
    pub specimen: Specimen,

    #[serde(default)]
    pub claimed_prior_registrations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkInfo {
    /// Exact text string of the mark
    pub literal: Option<String>,

    /// Format claim, e.g. "Standard Character Claim"
    #[serde(rename = "type")]
    pub mark_type: Option<String>,

    /// Register type, e.g. "Principal Register"
    pub register: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilingBasis {
    /// Filing basis, e.g. "1(a)", "1(b)", "44(e)"
    pub basis_type: Option<String>,

    pub use_in_commerce: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoodsClass {
    /// International Class number string, e.g. "030"
    pub class_id: String,

    /// Goods/services identification text
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub name: Option<String>,
    pub entity: Option<String>,
    pub citizenship: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Identifiers {
    pub serial_number: Option<String>,
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dates {
    pub filing_date: Option<String>,
    pub first_use: Option<String>,
    pub first_use_in_commerce: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkFeatures {
    pub is_standard_character: Option<bool>,
    pub is_design_mark: Option<bool>,
    pub contains_color_claim: Option<bool>,
    pub translation_statement: Option<String>,
    pub transliteration_statement: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Disclaimer {
    pub present: Option<bool>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Specimen {
    pub provided: Option<bool>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub specimen_type: Option<String>,
}

fn safe(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_PROVIDED,
    }
}

fn safe_bool(value: Option<bool>) -> String {
    value.map_or_else(|| NOT_PROVIDED.to_string(), |v| v.to_string())
}

/// Convert a structured application record into deterministic
/// natural-language query text for semantic retrieval.
///
/// Field order is fixed and goods classes are sorted by class id, so the
/// same record always embeds to the same query vector.
#[must_use]
pub fn record_to_query(record: &ApplicationRecord) -> String {
    let mut goods: Vec<&GoodsClass> = record.goods_and_services.iter().collect();
    goods.sort_by(|a, b| a.class_id.cmp(&b.class_id));

    let goods_section = if goods.is_empty() {
        format!("\n{NOT_PROVIDED}")
    } else {
        goods
            .iter()
            .map(|g| format!("\nClass {}: {}", g.class_id, safe(g.description.as_deref())))
            .collect()
    };

    format!(
        "Trademark Application Analysis Request:\n\n\
         Mark: {mark}\n\
         Mark Type: {mark_type}\n\
         Register: {register}\n\n\
         Filing Basis: {basis}\n\
         Use in Commerce: {use_in_commerce}\n\n\
         Owner Name: {owner}\n\
         Entity Type: {entity}\n\
         Citizenship: {citizenship}\n\n\
         Serial Number: {serial}\n\
         Registration Number: {registration}\n\n\
         Goods and Services:{goods_section}\n\n\
         Analyze the application strictly under TMEP guidelines \
         for potential examination issues.",
        mark = safe(record.mark_info.literal.as_deref()),
        mark_type = safe(record.mark_info.mark_type.as_deref()),
        register = safe(record.mark_info.register.as_deref()),
        basis = safe(record.filing_basis.basis_type.as_deref()),
        use_in_commerce = safe_bool(record.filing_basis.use_in_commerce),
        owner = safe(record.owner.name.as_deref()),
        entity = safe(record.owner.entity.as_deref()),
        citizenship = safe(record.owner.citizenship.as_deref()),
        serial = safe(record.identifiers.serial_number.as_deref()),
        registration = safe(record.identifiers.registration_number.as_deref()),
    )
}
