//! Remediation worklist from non-compliant and partial answers

use chrono::{DateTime, Duration, Utc};
use shared_types::{ComplianceStatus, QuestionAnswer, RemediationAction, Severity};
use tracing::instrument;

use crate::config::Schedule;
use crate::registry::BindingRegistry;

impl Schedule {
    /// Days until an action of the given severity is due
    pub fn days_for(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical_days,
            Severity::High => self.high_days,
            Severity::Medium => self.medium_days,
        }
    }

    pub fn due_date(&self, generated_at: DateTime<Utc>, severity: Severity) -> DateTime<Utc> {
        generated_at + Duration::days(i64::from(self.days_for(severity)))
    }
}

pub fn finding_for(question_id: &str) -> String {
    format!("Compliance gap identified in assessment question '{}'", question_id)
}

/// One action per non-compliant or partial answer that has a registry
/// binding, in answer order
#[instrument(skip_all, fields(answers = answers.len()))]
pub fn generate_remediation(
    registry: &BindingRegistry,
    answers: &[QuestionAnswer],
    generated_at: DateTime<Utc>,
    schedule: &Schedule,
) -> Vec<RemediationAction> {
    answers
        .iter()
        .filter(|answer| answer.compliance_status != ComplianceStatus::Compliant)
        .filter_map(|answer| {
            let binding = registry.get_binding(&answer.question_id)?;
            let severity = Severity::from(answer.risk_level);
            Some(RemediationAction {
                finding: finding_for(&answer.question_id),
                required_action: binding.statement(answer.compliance_status).to_string(),
                severity,
                due_date: schedule.due_date(generated_at, severity),
                question_id: answer.question_id.clone(),
            })
        })
        .collect()
}
