//! Placeholder substitution into literal document templates
//!
//! Templates carry placeholders of the exact form `{{FIELD_NAME}}`. Each
//! declared field replaces every occurrence of its own placeholder; any
//! placeholder without a matching field stays in the text as-is. The template
//! is scanned once, so placeholders inside injected text stay literal.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use shared_types::DocumentData;

lazy_static! {
    /// Any `{{NAME}}` placeholder, used for reporting only
    static ref PLACEHOLDER_PATTERN: Regex = Regex::new(r"\{\{([^{}]+)\}\}").unwrap();
}

pub fn placeholder(field_name: &str) -> String {
    format!("{{{{{}}}}}", field_name)
}

/// Pattern matching the placeholder of any declared field, names escaped
fn field_pattern(document: &DocumentData) -> Result<Regex, regex::Error> {
    let names: Vec<String> = document.fields.keys().map(|n| regex::escape(n)).collect();
    Regex::new(&format!(r"\{{\{{({})\}}\}}", names.join("|")))
}

/// Replace each field's placeholder with the field's current text
pub fn inject(template: &str, document: &DocumentData) -> String {
    if document.fields.is_empty() {
        return template.to_string();
    }

    let pattern = match field_pattern(document) {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::warn!(
                document = %document.document_name,
                error = %err,
                "placeholder pattern failed to build, template left as-is"
            );
            return template.to_string();
        }
    };

    // Closure replacement keeps `$` in legal text from being read as a capture group
    pattern
        .replace_all(template, |caps: &Captures| {
            document.value(&caps[1]).unwrap_or(&caps[0]).to_string()
        })
        .into_owned()
}

/// Placeholder names in a template, in order of first appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_PATTERN.captures_iter(template) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholders the document has no field for
pub fn unresolved_placeholders(template: &str, document: &DocumentData) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !document.fields.contains_key(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{ComplianceStatus, DocumentFieldValue, RiskLevel};

    fn document(fields: &[(&str, &str)]) -> DocumentData {
        let mut doc = DocumentData::new("DOC");
        for (name, value) in fields {
            doc.fields.insert(
                name.to_string(),
                DocumentFieldValue {
                    field_name: name.to_string(),
                    value: value.to_string(),
                    compliance_status: ComplianceStatus::Compliant,
                    risk_level: RiskLevel::Low,
                    source_questions: vec![],
                    evidence_files: vec![],
                    attestations: vec![],
                },
            );
        }
        doc
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let doc = document(&[("ORG", "Acme Clinic")]);
        assert_eq!(
            inject("{{ORG}} policy. Issued by {{ORG}}.", &doc),
            "Acme Clinic policy. Issued by Acme Clinic."
        );
    }

    #[test]
    fn test_unknown_placeholder_left_untouched() {
        let doc = document(&[("ORG", "Acme")]);
        assert_eq!(inject("{{ORG}} / {{MISSING}}", &doc), "Acme / {{MISSING}}");
        assert_eq!(unresolved_placeholders("{{ORG}} / {{MISSING}}", &doc), vec!["MISSING"]);
    }

    #[test]
    fn test_field_names_with_regex_metacharacters() {
        let doc = document(&[("COST.(USD)+", "$1,000"), ("A|B", "either")]);
        assert_eq!(
            inject("Fee: {{COST.(USD)+}}; {{A|B}}; {{COSTX(USD)+}}", &doc),
            "Fee: $1,000; either; {{COSTX(USD)+}}"
        );
    }

    #[test]
    fn test_dollar_signs_in_values_are_literal() {
        let doc = document(&[("X", "$0 and ${1}")]);
        assert_eq!(inject("[{{X}}]", &doc), "[$0 and ${1}]");
    }

    #[test]
    fn test_placeholder_syntax_is_exact() {
        let doc = document(&[("ORG", "Acme")]);
        assert_eq!(inject("{ORG} {{ ORG }} {{{ORG}}}", &doc), "{ORG} {{ ORG }} {Acme}");
    }

    #[test]
    fn test_placeholders_in_injected_text_stay_literal() {
        let doc = document(&[("A", "see {{B}}"), ("B", "b text"), ("Z", "{{A}}")]);
        assert_eq!(
            inject("{{A}} | {{B}} | {{Z}}", &doc),
            "see {{B}} | b text | {{A}}"
        );
    }

    #[test]
    fn test_overlapping_field_names() {
        let doc = document(&[("AB", "long"), ("A", "short")]);
        assert_eq!(inject("{{A}} {{AB}} {{ABC}}", &doc), "short long {{ABC}}");
    }

    #[test]
    fn test_empty_document_leaves_template_unchanged() {
        let doc = document(&[]);
        assert_eq!(inject("{{ORG}} text", &doc), "{{ORG}} text");
    }

    #[test]
    fn test_placeholders_listed_once_in_order() {
        assert_eq!(
            placeholders("{{B}} {{A}} {{B}} {{C}}"),
            vec!["B".to_string(), "A".to_string(), "C".to_string()]
        );
    }
}
