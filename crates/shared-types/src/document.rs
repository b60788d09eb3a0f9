//! Generated document field values and remediation records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::{Attestation, EvidenceFile};
use crate::types::{ComplianceStatus, RiskLevel, Severity};

/// An evidence file together with the question it was attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedEvidence {
    pub source_question: String,
    #[serde(flatten)]
    pub file: EvidenceFile,
}

/// Accumulated value of one document field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFieldValue {
    pub field_name: String,
    pub value: String,
    pub compliance_status: ComplianceStatus,
    pub risk_level: RiskLevel,
    /// Contributing question ids in first-seen order
    pub source_questions: Vec<String>,
    /// Not deduplicated; see the document-level evidence pass
    pub evidence_files: Vec<CollectedEvidence>,
    pub attestations: Vec<Attestation>,
}

/// All generated fields of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    pub document_name: String,
    pub fields: BTreeMap<String, DocumentFieldValue>,
}

impl DocumentData {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, field_name: &str) -> Option<&DocumentFieldValue> {
        self.fields.get(field_name)
    }

    /// Current text of a field, if the document has it
    pub fn value(&self, field_name: &str) -> Option<&str> {
        self.fields.get(field_name).map(|f| f.value.as_str())
    }
}

/// A scheduled corrective task derived from a non-compliant or partial answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationAction {
    pub finding: String,
    pub required_action: String,
    pub severity: Severity,
    pub due_date: DateTime<Utc>,
    pub question_id: String,
}

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub generated_at: DateTime<Utc>,
    pub documents: BTreeMap<String, DocumentData>,
    pub remediation: Vec<RemediationAction>,
}

impl GenerationOutput {
    pub fn document(&self, document_name: &str) -> Option<&DocumentData> {
        self.documents.get(document_name)
    }
}
