//! Registry entry types connecting questions to document fields

use serde::{Deserialize, Serialize};

use crate::types::ComplianceStatus;

/// A document field that a question contributes text to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentFieldBinding {
    pub document_name: String,
    pub field_name: String,
}

impl DocumentFieldBinding {
    pub fn new(document_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            field_name: field_name.into(),
        }
    }
}

/// Legal-statement text for each compliance status.
///
/// One field per status, so an entry that deserializes is guaranteed to
/// cover all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalStatements {
    #[serde(rename = "COMPLIANT")]
    pub compliant: String,
    #[serde(rename = "PARTIAL")]
    pub partial: String,
    #[serde(rename = "NON_COMPLIANT")]
    pub non_compliant: String,
}

impl LegalStatements {
    pub fn for_status(&self, status: ComplianceStatus) -> &str {
        match status {
            ComplianceStatus::Compliant => &self.compliant,
            ComplianceStatus::Partial => &self.partial,
            ComplianceStatus::NonCompliant => &self.non_compliant,
        }
    }
}

/// Registry entry for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBinding {
    pub question_id: String,
    pub affects: Vec<DocumentFieldBinding>,
    pub legal_statements: LegalStatements,
}

impl QuestionBinding {
    pub fn statement(&self, status: ComplianceStatus) -> &str {
        self.legal_statements.for_status(status)
    }
}
