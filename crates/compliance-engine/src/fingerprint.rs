//! Content fingerprint of a generation run
//!
//! SHA-256 over the canonical JSON of the generated documents and
//! remediation list. Two runs over the same answers, registry, config and
//! generation time produce the same fingerprint.

use serde::Serialize;
use sha2::{Digest, Sha256};
use shared_types::{DocumentData, GenerationOutput, RemediationAction};
use std::collections::BTreeMap;

#[derive(Serialize)]
struct FingerprintInput<'a> {
    documents: &'a BTreeMap<String, DocumentData>,
    remediation: &'a [RemediationAction],
}

/// Hex-encoded SHA-256 of the output's documents and remediation actions
pub fn fingerprint(output: &GenerationOutput) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(&FingerprintInput {
        documents: &output.documents,
        remediation: &output.remediation,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}
