//! Compliance document synthesis engine
//!
//! Turns an ordered set of assessment answers into the legal text that
//! populates generated policy documents, plus a remediation worklist.
//!
//! Pipeline, per run:
//! 1. Aggregate: fold answers into per-document field values, resolving
//!    conflicts when several answers touch the same field
//! 2. Evidence: deduplicate evidence and attestations per document and
//!    write them into field text
//! 3. Remediation: schedule an action for every non-compliant or partial answer
//!
//! Template injection is a separate step over the finished documents.
//! Every run builds its own accumulator; the registry is read-only, so runs
//! can proceed concurrently without locking.

pub mod aggregate;
pub mod answers;
pub mod classifier;
pub mod config;
pub mod error;
pub mod evidence;
pub mod fingerprint;
pub mod patterns;
pub mod registry;
pub mod remediation;
pub mod risk;
pub mod template;

pub use aggregate::{aggregate_answers, resolve_status};
pub use classifier::classify;
pub use config::EngineConfig;
pub use error::{AnswerError, ConfigError, RegistryError};
pub use registry::BindingRegistry;
pub use risk::risk_level;
pub use template::inject;

use chrono::{DateTime, Utc};
use shared_types::{GenerationOutput, QuestionAnswer};
use tracing::{info, instrument};

/// SynthesisEngine entry point
pub struct SynthesisEngine<'r> {
    registry: &'r BindingRegistry,
    config: EngineConfig,
}

impl<'r> SynthesisEngine<'r> {
    pub fn new(registry: &'r BindingRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &BindingRegistry {
        self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate document field values and remediation actions.
    ///
    /// Deterministic in `answers` (including their order) and `generated_at`.
    #[instrument(skip_all, fields(answers = answers.len()))]
    pub fn generate(
        &self,
        answers: &[QuestionAnswer],
        generated_at: DateTime<Utc>,
    ) -> GenerationOutput {
        let mut documents = aggregate::aggregate_answers(
            self.registry,
            answers,
            &self.config.wording.signer_name,
        );

        for document in documents.values_mut() {
            evidence::collect_evidence(document, &self.config);
        }

        let remediation = remediation::generate_remediation(
            self.registry,
            answers,
            generated_at,
            &self.config.schedule,
        );

        info!(
            documents = documents.len(),
            remediation_actions = remediation.len(),
            "document synthesis complete"
        );

        GenerationOutput {
            generated_at,
            documents,
            remediation,
        }
    }

    /// Generate using the current time
    pub fn generate_now(&self, answers: &[QuestionAnswer]) -> GenerationOutput {
        self.generate(answers, Utc::now())
    }

    /// Inject one generated document into a template.
    ///
    /// An unknown document leaves the template unchanged.
    pub fn render(&self, template: &str, document_name: &str, output: &GenerationOutput) -> String {
        match output.document(document_name) {
            Some(document) => template::inject(template, document),
            None => template.to_string(),
        }
    }
}

impl Default for SynthesisEngine<'static> {
    fn default() -> Self {
        Self::new(BindingRegistry::builtin(), EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_types::{ComplianceStatus, RiskLevel, Severity};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap()
    }

    fn answer(id: &str, status: ComplianceStatus, level: RiskLevel) -> QuestionAnswer {
        QuestionAnswer::new(id, "x", status, level, now(), "198.51.100.4")
    }

    #[test]
    fn test_engine_populates_builtin_documents() {
        let engine = SynthesisEngine::default();
        let output = engine.generate(
            &[
                answer("access_mfa", ComplianceStatus::Compliant, RiskLevel::Low),
                answer("encryption_at_rest", ComplianceStatus::NonCompliant, RiskLevel::Critical),
            ],
            now(),
        );

        let access = output.document("ACCESS_CONTROL_POLICY").unwrap();
        assert!(access
            .value("AUTHENTICATION_CONTROLS")
            .unwrap()
            .starts_with("Multi-factor authentication is enforced"));

        let master = output.document("MASTER_SECURITY_POLICY").unwrap();
        assert_eq!(
            master
                .field("SECURITY_POSTURE_STATEMENT")
                .unwrap()
                .compliance_status,
            ComplianceStatus::NonCompliant
        );

        assert_eq!(output.remediation.len(), 1);
        assert_eq!(output.remediation[0].severity, Severity::Critical);
        assert_eq!(output.remediation[0].question_id, "encryption_at_rest");
    }

    #[test]
    fn test_engine_skips_unknown_questions() {
        let engine = SynthesisEngine::default();
        let output = engine.generate(
            &[answer("not_in_registry", ComplianceStatus::NonCompliant, RiskLevel::Critical)],
            now(),
        );
        assert!(output.documents.is_empty());
        assert!(output.remediation.is_empty());
    }

    #[test]
    fn test_render_unknown_document_returns_template() {
        let engine = SynthesisEngine::default();
        let output = engine.generate(&[], now());
        assert_eq!(
            engine.render("{{AUTHENTICATION_CONTROLS}}", "NOPE", &output),
            "{{AUTHENTICATION_CONTROLS}}"
        );
    }

    #[test]
    fn test_render_injects_document_fields() {
        let engine = SynthesisEngine::default();
        let output = engine.generate(
            &[answer("access_automatic_logoff", ComplianceStatus::Compliant, RiskLevel::Low)],
            now(),
        );
        let rendered = engine.render(
            "Logoff: {{AUTOMATIC_LOGOFF}}",
            "ACCESS_CONTROL_POLICY",
            &output,
        );
        assert_eq!(
            rendered,
            "Logoff: Electronic sessions are terminated automatically after a predetermined period of inactivity."
        );
    }
}
