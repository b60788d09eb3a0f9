//! Answer ingestion
//!
//! Two ways into `QuestionAnswer`:
//! - `AnswerSubmission`: a raw questionnaire submission (selected option plus
//!   its numeric score), classified and scored here
//! - `RawAnswer`: an already-classified record from an upstream JSON feed,
//!   whose status and risk strings must name known variants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ComplianceStatus, EvidenceFile, QuestionAnswer, RiskLevel};
use tracing::warn;

use crate::classifier::classify;
use crate::error::AnswerError;
use crate::risk::risk_level;

/// A questionnaire submission before classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: String,
    pub selected_option: String,
    /// Option score from the question catalog
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub evidence_files: Vec<EvidenceFile>,
    #[serde(default)]
    pub attestation_signed: bool,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
}

impl From<AnswerSubmission> for QuestionAnswer {
    fn from(submission: AnswerSubmission) -> Self {
        let status = classify(&submission.question_id, &submission.selected_option);
        QuestionAnswer {
            risk_level: risk_level(status, submission.score),
            compliance_status: status,
            risk_score: Some(submission.score),
            question_id: submission.question_id,
            selected_option: submission.selected_option,
            evidence_files: submission.evidence_files,
            attestation_signed: submission.attestation_signed,
            timestamp: submission.timestamp,
            ip_address: submission.ip_address,
        }
    }
}

/// An upstream answer record with loosely-typed status fields
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnswer {
    pub question_id: String,
    #[serde(default)]
    pub selected_option: String,
    pub compliance_status: String,
    pub risk_level: String,
    #[serde(default)]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub evidence_files: Vec<EvidenceFile>,
    #[serde(default)]
    pub attestation_signed: bool,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
}

impl TryFrom<RawAnswer> for QuestionAnswer {
    type Error = AnswerError;

    fn try_from(raw: RawAnswer) -> Result<Self, Self::Error> {
        let invalid = |source| AnswerError::InvalidValue {
            question_id: raw.question_id.clone(),
            source,
        };
        let compliance_status = raw
            .compliance_status
            .parse::<ComplianceStatus>()
            .map_err(invalid)?;
        let risk_level = raw.risk_level.parse::<RiskLevel>().map_err(invalid)?;

        Ok(QuestionAnswer {
            question_id: raw.question_id,
            selected_option: raw.selected_option,
            compliance_status,
            risk_level,
            risk_score: raw.risk_score,
            evidence_files: raw.evidence_files,
            attestation_signed: raw.attestation_signed,
            timestamp: raw.timestamp,
            ip_address: raw.ip_address,
        })
    }
}

/// Parse a JSON array of answer records.
///
/// Only a feed that is not a JSON array is an error. Individual records
/// that are malformed or carry an unknown status are skipped with a
/// warning, so one bad record never aborts a run.
pub fn parse_answers(json: &str) -> Result<Vec<QuestionAnswer>, AnswerError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = records.len();

    let answers: Vec<QuestionAnswer> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let raw = match serde_json::from_value::<RawAnswer>(record) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(index, error = %err, "skipping malformed answer record");
                    return None;
                }
            };
            match QuestionAnswer::try_from(raw) {
                Ok(answer) => Some(answer),
                Err(err) => {
                    warn!(index, error = %err, "skipping answer record");
                    None
                }
            }
        })
        .collect();

    if answers.len() < total {
        warn!(
            accepted = answers.len(),
            skipped = total - answers.len(),
            "some answer records were rejected"
        );
    }

    Ok(answers)
}

/// Parse a JSON array of questionnaire submissions and classify each one
pub fn parse_submissions(json: &str) -> Result<Vec<QuestionAnswer>, AnswerError> {
    let submissions: Vec<AnswerSubmission> = serde_json::from_str(json)?;
    Ok(submissions.into_iter().map(QuestionAnswer::from).collect())
}
