//! Field aggregation and conflict resolution
//!
//! Folds answers, in submission order, into one accumulated value per
//! (document, field). When a second answer touches a field that already has
//! a value, the worse status wins and the two statements are merged into a
//! single text whose layout depends on which side was worse.

use std::collections::BTreeMap;

use shared_types::{
    Attestation, CollectedEvidence, ComplianceStatus, DocumentData, DocumentFieldValue,
    QuestionAnswer,
};
use tracing::{debug, instrument};

use crate::registry::BindingRegistry;
use crate::risk::{proxy_score, risk_level};

pub const PARAGRAPH_BREAK: &str = "\n\n";
pub const PREVIOUS_ASSESSMENT_PREFIX: &str = "Note: Previous assessment indicated: ";
pub const ADDITIONAL_ASSESSMENT_PREFIX: &str = "Additional assessment: ";

/// Status of a field touched by two answers: the worse of the two
pub fn resolve_status(a: ComplianceStatus, b: ComplianceStatus) -> ComplianceStatus {
    a.worst(b)
}

/// Merge an incoming statement into a field's existing text.
///
/// Only a NON_COMPLIANT side gets the labelled layouts; any mix of COMPLIANT
/// and PARTIAL is joined in submission order like equal statuses.
pub fn merge_statement(
    existing: &str,
    existing_status: ComplianceStatus,
    incoming: &str,
    incoming_status: ComplianceStatus,
) -> String {
    let existing_gap = existing_status == ComplianceStatus::NonCompliant;
    let incoming_gap = incoming_status == ComplianceStatus::NonCompliant;

    if incoming_gap && !existing_gap {
        format!(
            "{}{}{}{}",
            incoming, PARAGRAPH_BREAK, PREVIOUS_ASSESSMENT_PREFIX, existing
        )
    } else if existing_gap && !incoming_gap {
        format!(
            "{}{}{}{}",
            existing, PARAGRAPH_BREAK, ADDITIONAL_ASSESSMENT_PREFIX, incoming
        )
    } else {
        format!("{}{}{}", existing, PARAGRAPH_BREAK, incoming)
    }
}

/// Per-run accumulator of document field values.
///
/// Owned by a single generation call; never shared.
pub struct FieldAggregator<'r> {
    registry: &'r BindingRegistry,
    signer_name: &'r str,
    documents: BTreeMap<String, DocumentData>,
}

impl<'r> FieldAggregator<'r> {
    pub fn new(registry: &'r BindingRegistry, signer_name: &'r str) -> Self {
        Self {
            registry,
            signer_name,
            documents: BTreeMap::new(),
        }
    }

    /// Fold one answer into every field its binding affects.
    ///
    /// Returns the number of fields touched; answers without a binding touch
    /// none.
    pub fn absorb(&mut self, answer: &QuestionAnswer) -> usize {
        let registry = self.registry;
        let Some(binding) = registry.get_binding(&answer.question_id) else {
            debug!(
                question_id = %answer.question_id,
                "no registry binding, answer contributes nothing"
            );
            return 0;
        };

        let statement = binding.statement(answer.compliance_status);
        let evidence = collected_evidence(answer);
        let attestation = self.attestation(answer);

        for target in &binding.affects {
            let document = self
                .documents
                .entry(target.document_name.clone())
                .or_insert_with(|| DocumentData::new(target.document_name.clone()));

            match document.fields.get_mut(&target.field_name) {
                Some(field) => {
                    merge_into(field, answer, statement, &evidence, attestation.as_ref())
                }
                None => {
                    document.fields.insert(
                        target.field_name.clone(),
                        DocumentFieldValue {
                            field_name: target.field_name.clone(),
                            value: statement.to_string(),
                            compliance_status: answer.compliance_status,
                            risk_level: answer.risk_level,
                            source_questions: vec![answer.question_id.clone()],
                            evidence_files: evidence.clone(),
                            attestations: attestation.iter().cloned().collect(),
                        },
                    );
                }
            }
        }

        binding.affects.len()
    }

    pub fn finish(self) -> BTreeMap<String, DocumentData> {
        self.documents
    }

    fn attestation(&self, answer: &QuestionAnswer) -> Option<Attestation> {
        answer.attestation_signed.then(|| Attestation {
            timestamp: answer.timestamp,
            ip_address: answer.ip_address.clone(),
            signer_name: self.signer_name.to_string(),
        })
    }
}

fn collected_evidence(answer: &QuestionAnswer) -> Vec<CollectedEvidence> {
    answer
        .evidence_files
        .iter()
        .map(|file| CollectedEvidence {
            source_question: answer.question_id.clone(),
            file: file.clone(),
        })
        .collect()
}

fn merge_into(
    field: &mut DocumentFieldValue,
    answer: &QuestionAnswer,
    statement: &str,
    evidence: &[CollectedEvidence],
    attestation: Option<&Attestation>,
) {
    let resolved = resolve_status(field.compliance_status, answer.compliance_status);

    field.value = merge_statement(
        &field.value,
        field.compliance_status,
        statement,
        answer.compliance_status,
    );

    // Prefer the answer's real score; fall back to the coarse proxy when the
    // upstream feed only supplied a level.
    let score = answer
        .risk_score
        .unwrap_or_else(|| proxy_score(answer.risk_level));
    field.risk_level = risk_level(resolved, score);
    field.compliance_status = resolved;

    field.source_questions.push(answer.question_id.clone());
    field.evidence_files.extend_from_slice(evidence);
    field.attestations.extend(attestation.cloned());
}

/// Fold all answers, in order, into per-document field values
#[instrument(skip_all, fields(answers = answers.len()))]
pub fn aggregate_answers(
    registry: &BindingRegistry,
    answers: &[QuestionAnswer],
    signer_name: &str,
) -> BTreeMap<String, DocumentData> {
    let mut aggregator = FieldAggregator::new(registry, signer_name);
    let touched: usize = answers.iter().map(|a| aggregator.absorb(a)).sum();
    debug!(fields_touched = touched, "aggregation complete");
    aggregator.finish()
}
