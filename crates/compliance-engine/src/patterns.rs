//! Answer-option vocabularies and document naming conventions

/// Options meaning the control is in place: done, current, routine
pub const AFFIRMATIVE_OPTIONS: &[&str] = &[
    "yes",
    "yes_current",
    "yes_documented",
    "yes_routine",
    "yes_regularly",
    "yes_annually",
    "current",
    "routine",
    "always",
    "implemented",
    "completed",
];

/// Options meaning the control exists but is incomplete, informal,
/// out of date, or only done now and then
pub const HEDGE_OPTIONS: &[&str] = &[
    "partial",
    "partially",
    "informal",
    "yes_informal",
    "yes_outdated",
    "yes_stale",
    "outdated",
    "yes_occasionally",
    "occasionally",
    "sometimes",
    "in_progress",
];

/// A plain negative
pub const NEGATIVE_OPTIONS: &[&str] = &["no"];

/// Document carrying the organization-wide security posture statement
pub const MASTER_DOCUMENT: &str = "MASTER_SECURITY_POLICY";

/// Field overwritten with the document's deduplicated evidence list
pub const AUDIT_EVIDENCE_FIELD: &str = "AUDIT_EVIDENCE_LIST";

/// Field that receives risk-assessment evidence as an appendix
pub const RISK_ANALYSIS_FIELD: &str = "RISK_ANALYSIS_DOCUMENTATION";

/// Field in the master document that receives the attestation sentence
pub const SECURITY_POSTURE_FIELD: &str = "SECURITY_POSTURE_STATEMENT";

/// Question-id prefixes whose evidence counts as risk-assessment evidence
pub const RISK_EVIDENCE_PREFIXES: &[&str] = &["risk_", "vuln_", "sra_"];

/// Lower-cases an option and unifies separators: "Yes - Current" -> "yes_current"
pub fn normalize_option(option: &str) -> String {
    let mut normalized = String::with_capacity(option.len());
    let mut pending_separator = false;

    for c in option.trim().chars() {
        if c.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    normalized
}

/// Check whether a normalized option belongs to a vocabulary
pub fn in_vocabulary(normalized: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|candidate| *candidate == normalized)
}

/// Check whether a question id carries one of the given prefixes
pub fn has_any_prefix(question_id: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|prefix| question_id.starts_with(prefix.as_str()))
}
