pub mod answer;
pub mod binding;
pub mod document;
pub mod types;

pub use answer::{Attestation, EvidenceFile, QuestionAnswer};
pub use binding::{DocumentFieldBinding, LegalStatements, QuestionBinding};
pub use document::{
    CollectedEvidence, DocumentData, DocumentFieldValue, GenerationOutput, RemediationAction,
};
pub use types::{ComplianceStatus, RiskLevel, Severity, UnknownVariant};
