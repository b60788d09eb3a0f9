//! Engine configuration
//!
//! TOML-based settings for the naming conventions the evidence pass relies
//! on, the fixed wording it inserts, and the remediation due-date windows.
//! Every key has a default, so an empty file yields `EngineConfig::default()`.

use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::patterns;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Conventionally-named documents and fields
    #[serde(default)]
    pub conventions: Conventions,
    /// Fixed sentences and formatting
    #[serde(default)]
    pub wording: Wording,
    /// Remediation due-date windows
    #[serde(default)]
    pub schedule: Schedule,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or a value fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.wording.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(
                self.wording.date_format.clone(),
            ));
        }

        let c = &self.conventions;
        if c.audit_evidence_field == c.risk_analysis_field {
            return Err(ConfigError::Invalid(
                "audit_evidence_field and risk_analysis_field must differ".to_string(),
            ));
        }
        if c.risk_evidence_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "risk_evidence_prefixes must not contain an empty prefix".to_string(),
            ));
        }

        Ok(())
    }
}

/// Names the evidence pass treats specially
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conventions {
    #[serde(default = "default_master_document")]
    pub master_document: String,
    #[serde(default = "default_audit_evidence_field")]
    pub audit_evidence_field: String,
    #[serde(default = "default_risk_analysis_field")]
    pub risk_analysis_field: String,
    #[serde(default = "default_security_posture_field")]
    pub security_posture_field: String,
    #[serde(default = "default_risk_evidence_prefixes")]
    pub risk_evidence_prefixes: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            master_document: default_master_document(),
            audit_evidence_field: default_audit_evidence_field(),
            risk_analysis_field: default_risk_analysis_field(),
            security_posture_field: default_security_posture_field(),
            risk_evidence_prefixes: default_risk_evidence_prefixes(),
        }
    }
}

fn default_master_document() -> String {
    patterns::MASTER_DOCUMENT.to_string()
}

fn default_audit_evidence_field() -> String {
    patterns::AUDIT_EVIDENCE_FIELD.to_string()
}

fn default_risk_analysis_field() -> String {
    patterns::RISK_ANALYSIS_FIELD.to_string()
}

fn default_security_posture_field() -> String {
    patterns::SECURITY_POSTURE_FIELD.to_string()
}

fn default_risk_evidence_prefixes() -> Vec<String> {
    patterns::RISK_EVIDENCE_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Fixed wording inserted by the evidence pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wording {
    /// Follows the evidence list in the audit-evidence field
    #[serde(default = "default_retention_statement")]
    pub retention_statement: String,
    /// Replaces the audit-evidence field when the document has no evidence
    #[serde(default = "default_missing_evidence_statement")]
    pub missing_evidence_statement: String,
    /// chrono strftime format for human-readable dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Name recorded on attestations synthesized from signed answers
    #[serde(default = "default_signer_name")]
    pub signer_name: String,
}

impl Default for Wording {
    fn default() -> Self {
        Self {
            retention_statement: default_retention_statement(),
            missing_evidence_statement: default_missing_evidence_statement(),
            date_format: default_date_format(),
            signer_name: default_signer_name(),
        }
    }
}

fn default_retention_statement() -> String {
    "All evidence listed above is retained for a minimum of six (6) years from the date of \
     creation or the date when it was last in effect, whichever is later, in accordance with \
     the Documentation Retention Policy."
        .to_string()
}

fn default_missing_evidence_statement() -> String {
    "No supporting evidence has been uploaded for this assessment period. Supporting \
     documentation will be collected and retained as described in the Documentation \
     Retention Policy."
        .to_string()
}

fn default_date_format() -> String {
    "%B %-d, %Y".to_string()
}

fn default_signer_name() -> String {
    "Authorized Representative".to_string()
}

/// Days from generation until a remediation action is due, per severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default = "default_critical_days")]
    pub critical_days: u32,
    #[serde(default = "default_high_days")]
    pub high_days: u32,
    #[serde(default = "default_medium_days")]
    pub medium_days: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            critical_days: default_critical_days(),
            high_days: default_high_days(),
            medium_days: default_medium_days(),
        }
    }
}

fn default_critical_days() -> u32 {
    30
}

fn default_high_days() -> u32 {
    60
}

fn default_medium_days() -> u32 {
    90
}
