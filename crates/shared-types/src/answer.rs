//! Assessment answers as handed to the synthesis engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ComplianceStatus, RiskLevel};

/// Reference to a supporting file uploaded for an answer.
///
/// The engine never dereferences `storage_ref` or `download_url`; both are
/// resolved by the storage layer before answers reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub file_id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl EvidenceFile {
    pub fn new(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            uploaded_at,
            storage_ref: None,
            download_url: None,
        }
    }

    pub fn with_storage_ref(mut self, storage_ref: impl Into<String>) -> Self {
        self.storage_ref = Some(storage_ref.into());
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }
}

/// A signed assertion accompanying an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub signer_name: String,
}

/// One submitted assessment answer.
///
/// `compliance_status` and `risk_level` are computed upstream from the
/// selected option and its numeric score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: String,
    pub selected_option: String,
    pub compliance_status: ComplianceStatus,
    pub risk_level: RiskLevel,
    /// Numeric option score the risk level was derived from, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub evidence_files: Vec<EvidenceFile>,
    #[serde(default)]
    pub attestation_signed: bool,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
}

impl QuestionAnswer {
    pub fn new(
        question_id: impl Into<String>,
        selected_option: impl Into<String>,
        compliance_status: ComplianceStatus,
        risk_level: RiskLevel,
        timestamp: DateTime<Utc>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            selected_option: selected_option.into(),
            compliance_status,
            risk_level,
            risk_score: None,
            evidence_files: Vec::new(),
            attestation_signed: false,
            timestamp,
            ip_address: ip_address.into(),
        }
    }

    pub fn with_risk_score(mut self, score: u32) -> Self {
        self.risk_score = Some(score);
        self
    }

    pub fn with_evidence(mut self, file: EvidenceFile) -> Self {
        self.evidence_files.push(file);
        self
    }

    pub fn signed(mut self) -> Self {
        self.attestation_signed = true;
        self
    }
}
