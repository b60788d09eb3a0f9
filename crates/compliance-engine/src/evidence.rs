//! Evidence and attestation collection
//!
//! Second, document-scoped pass over aggregated fields. Evidence and
//! attestations gathered during aggregation are deduplicated across the
//! whole document and written into field text:
//!
//! - the audit-evidence field is replaced by the deduplicated evidence list
//! - the risk-analysis field gets the risk-assessment subset appended
//! - every other field gets its own evidence and first attestation appended
//! - the master document's security-posture field gets an attestation sentence

use std::collections::HashSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use shared_types::{Attestation, CollectedEvidence, DocumentData};

use crate::config::EngineConfig;
use crate::patterns::has_any_prefix;

/// Document-wide evidence and attestations, first occurrence kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentEvidence {
    pub evidence: Vec<CollectedEvidence>,
    pub attestations: Vec<Attestation>,
}

/// Gather evidence by (file_name, uploaded_at) and attestations by
/// (timestamp, ip_address) across every field of a document
pub fn deduplicate(document: &DocumentData) -> DocumentEvidence {
    let mut seen_files: HashSet<(&str, DateTime<Utc>)> = HashSet::new();
    let mut seen_attestations: HashSet<(DateTime<Utc>, &str)> = HashSet::new();
    let mut out = DocumentEvidence::default();

    for field in document.fields.values() {
        for item in &field.evidence_files {
            if seen_files.insert((item.file.file_name.as_str(), item.file.uploaded_at)) {
                out.evidence.push(item.clone());
            }
        }
        for attestation in &field.attestations {
            if seen_attestations.insert((attestation.timestamp, attestation.ip_address.as_str())) {
                out.attestations.push(attestation.clone());
            }
        }
    }

    out
}

/// Run the evidence pass over one document, returning what was collected
pub fn collect_evidence(document: &mut DocumentData, config: &EngineConfig) -> DocumentEvidence {
    let collected = deduplicate(document);
    let conventions = &config.conventions;
    let wording = &config.wording;
    let date_format = wording.date_format.as_str();

    if let Some(field) = document.fields.get_mut(&conventions.audit_evidence_field) {
        field.value = if collected.evidence.is_empty() {
            wording.missing_evidence_statement.clone()
        } else {
            format!(
                "{}\n\n{}",
                evidence_list(&collected.evidence, date_format),
                wording.retention_statement
            )
        };
    }

    if let Some(field) = document.fields.get_mut(&conventions.risk_analysis_field) {
        let risk_evidence: Vec<CollectedEvidence> = collected
            .evidence
            .iter()
            .filter(|e| has_any_prefix(&e.source_question, &conventions.risk_evidence_prefixes))
            .cloned()
            .collect();
        if !risk_evidence.is_empty() {
            field.value.push_str("\n\nRisk assessment evidence on file:\n");
            field
                .value
                .push_str(&evidence_list(&risk_evidence, date_format));
        }
    }

    for (name, field) in document.fields.iter_mut() {
        if *name == conventions.audit_evidence_field || *name == conventions.risk_analysis_field {
            continue;
        }

        if !field.evidence_files.is_empty() {
            field.value.push_str("\n\nSupporting evidence:\n");
            field
                .value
                .push_str(&evidence_list(&field.evidence_files, date_format));
        }

        if let Some(first) = field.attestations.first() {
            field.value.push_str(&format!(
                "\n\nThis statement was electronically attested on {} from IP address {}.",
                format_date(first.timestamp, date_format),
                first.ip_address
            ));
        }
    }

    if document.document_name == conventions.master_document {
        if let (Some(first), Some(field)) = (
            collected.attestations.first(),
            document.fields.get_mut(&conventions.security_posture_field),
        ) {
            field.value.push_str(&format!(
                "\n\nThe security posture described in this policy was attested by {} on {} \
                 from IP address {}.",
                first.signer_name,
                format_date(first.timestamp, date_format),
                first.ip_address
            ));
        }
    }

    collected
}

/// One bullet per entry: name, optional link, source question, upload date
pub fn evidence_list(evidence: &[CollectedEvidence], date_format: &str) -> String {
    evidence
        .iter()
        .map(|e| {
            let link = e
                .file
                .download_url
                .as_deref()
                .map(|url| format!(" <{}>", url))
                .unwrap_or_default();
            format!(
                "- {}{} (question: {}, uploaded {})",
                e.file.file_name,
                link,
                e.source_question,
                format_date(e.file.uploaded_at, date_format)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable date; falls back to ISO format if `date_format` is invalid
pub fn format_date(timestamp: DateTime<Utc>, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(date_format)).is_err() {
        out.clear();
        out.push_str(&timestamp.format("%Y-%m-%d").to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use shared_types::{ComplianceStatus, DocumentFieldValue, EvidenceFile, RiskLevel};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn evidence(question: &str, name: &str, day: u32) -> CollectedEvidence {
        CollectedEvidence {
            source_question: question.to_string(),
            file: EvidenceFile::new(format!("id-{}", name), name, ts(day)),
        }
    }

    fn field(name: &str, value: &str) -> DocumentFieldValue {
        DocumentFieldValue {
            field_name: name.to_string(),
            value: value.to_string(),
            compliance_status: ComplianceStatus::Compliant,
            risk_level: RiskLevel::Low,
            source_questions: vec![],
            evidence_files: vec![],
            attestations: vec![],
        }
    }

    fn document(name: &str, fields: Vec<DocumentFieldValue>) -> DocumentData {
        let mut doc = DocumentData::new(name);
        for f in fields {
            doc.fields.insert(f.field_name.clone(), f);
        }
        doc
    }

    fn attestation(day: u32, ip: &str) -> Attestation {
        Attestation {
            timestamp: ts(day),
            ip_address: ip.to_string(),
            signer_name: "Dana Reyes".to_string(),
        }
    }

    #[test]
    fn test_format_date_default_style() {
        assert_eq!(format_date(ts(5), "%B %-d, %Y"), "January 5, 2024");
    }

    #[test]
    fn test_evidence_list_with_and_without_link() {
        let mut with_link = evidence("q1", "scan.pdf", 2);
        with_link.file.download_url = Some("https://files.example/scan".to_string());
        let list = evidence_list(&[with_link, evidence("q2", "log.csv", 3)], "%Y-%m-%d");
        assert_eq!(
            list,
            "- scan.pdf <https://files.example/scan> (question: q1, uploaded 2024-01-02)\n\
             - log.csv (question: q2, uploaded 2024-01-03)"
        );
    }

    #[test]
    fn test_deduplicates_across_fields() {
        let mut a = field("A", "a");
        a.evidence_files = vec![evidence("q1", "policy.pdf", 1)];
        a.attestations = vec![attestation(1, "10.0.0.1")];
        let mut b = field("B", "b");
        b.evidence_files = vec![evidence("q2", "policy.pdf", 1), evidence("q2", "other.pdf", 1)];
        b.attestations = vec![attestation(1, "10.0.0.1"), attestation(1, "10.0.0.2")];

        let collected = deduplicate(&document("DOC", vec![a, b]));
        assert_eq!(collected.evidence.len(), 2);
        assert_eq!(collected.evidence[0].source_question, "q1");
        assert_eq!(collected.attestations.len(), 2);
    }

    #[test]
    fn test_same_name_different_upload_is_kept() {
        let mut a = field("A", "a");
        a.evidence_files = vec![evidence("q1", "policy.pdf", 1), evidence("q1", "policy.pdf", 2)];
        assert_eq!(deduplicate(&document("DOC", vec![a])).evidence.len(), 2);
    }

    #[test]
    fn test_audit_field_replaced_with_list_and_retention() {
        let config = EngineConfig::default();
        let mut a = field("ACCESS", "access text");
        a.evidence_files = vec![evidence("q1", "mfa.png", 4)];
        let mut doc = document("DOC", vec![a, field("AUDIT_EVIDENCE_LIST", "placeholder")]);

        collect_evidence(&mut doc, &config);

        let audit = doc.value("AUDIT_EVIDENCE_LIST").unwrap();
        assert!(audit.starts_with("- mfa.png (question: q1, uploaded January 4, 2024)\n\n"));
        assert!(audit.ends_with(&config.wording.retention_statement));
        assert!(!audit.contains("placeholder"));
    }

    #[test]
    fn test_audit_field_fallback_without_evidence() {
        let config = EngineConfig::default();
        let mut doc = document("DOC", vec![field("AUDIT_EVIDENCE_LIST", "placeholder")]);
        collect_evidence(&mut doc, &config);
        assert_eq!(
            doc.value("AUDIT_EVIDENCE_LIST"),
            Some(config.wording.missing_evidence_statement.as_str())
        );
    }

    #[test]
    fn test_risk_field_gets_only_prefixed_evidence() {
        let config = EngineConfig::default();
        let mut other = field("OTHER", "other");
        other.evidence_files = vec![
            evidence("risk_analysis_completed", "sra.pdf", 1),
            evidence("access_mfa", "mfa.png", 1),
        ];
        let mut doc = document("DOC", vec![other, field("RISK_ANALYSIS_DOCUMENTATION", "risk")]);

        collect_evidence(&mut doc, &config);

        let risk = doc.value("RISK_ANALYSIS_DOCUMENTATION").unwrap();
        assert!(risk.starts_with("risk\n\nRisk assessment evidence on file:\n- sra.pdf"));
        assert!(!risk.contains("mfa.png"));
    }

    #[test]
    fn test_risk_field_untouched_without_matching_evidence() {
        let config = EngineConfig::default();
        let mut doc = document("DOC", vec![field("RISK_ANALYSIS_DOCUMENTATION", "risk")]);
        collect_evidence(&mut doc, &config);
        assert_eq!(doc.value("RISK_ANALYSIS_DOCUMENTATION"), Some("risk"));
    }

    #[test]
    fn test_regular_field_gets_own_evidence_and_first_attestation() {
        let config = EngineConfig::default();
        let mut a = field("A", "statement");
        a.evidence_files = vec![evidence("q1", "x.pdf", 1), evidence("q2", "x.pdf", 1)];
        a.attestations = vec![attestation(6, "192.168.1.5"), attestation(7, "192.168.1.6")];
        let mut doc = document("DOC", vec![a]);

        collect_evidence(&mut doc, &config);

        assert_eq!(
            doc.value("A").unwrap(),
            "statement\n\nSupporting evidence:\n\
             - x.pdf (question: q1, uploaded January 1, 2024)\n\
             - x.pdf (question: q2, uploaded January 1, 2024)\n\n\
             This statement was electronically attested on January 6, 2024 from IP address 192.168.1.5."
        );
    }

    #[test]
    fn test_master_document_posture_attestation() {
        let config = EngineConfig::default();
        let mut a = field("SECURITY_OFFICER", "officer");
        a.attestations = vec![attestation(8, "172.16.0.9")];
        let mut doc = document(
            "MASTER_SECURITY_POLICY",
            vec![a, field("SECURITY_POSTURE_STATEMENT", "posture")],
        );

        collect_evidence(&mut doc, &config);

        assert_eq!(
            doc.value("SECURITY_POSTURE_STATEMENT").unwrap(),
            "posture\n\nThe security posture described in this policy was attested by Dana Reyes \
             on January 8, 2024 from IP address 172.16.0.9."
        );
    }

    #[test]
    fn test_posture_sentence_only_in_master_document() {
        let config = EngineConfig::default();
        let mut a = field("SECURITY_OFFICER", "officer");
        a.attestations = vec![attestation(8, "172.16.0.9")];
        let mut doc = document(
            "ACCESS_CONTROL_POLICY",
            vec![a, field("SECURITY_POSTURE_STATEMENT", "posture")],
        );
        collect_evidence(&mut doc, &config);
        assert_eq!(doc.value("SECURITY_POSTURE_STATEMENT"), Some("posture"));
    }
}
