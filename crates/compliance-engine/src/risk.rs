//! Risk level calculation

use shared_types::{ComplianceStatus, RiskLevel};

/// Score at or above which any answer is CRITICAL
pub const CRITICAL_SCORE: u32 = 4;

/// Score at or above which any answer is at least HIGH
pub const HIGH_SCORE: u32 = 2;

/// Derive a risk level from a status and a numeric risk score.
///
/// Rules are checked in order, so a high score overrides a COMPLIANT
/// status: `(Compliant, 5)` is CRITICAL.
pub fn risk_level(status: ComplianceStatus, score: u32) -> RiskLevel {
    if status == ComplianceStatus::Compliant && score == 0 {
        RiskLevel::Low
    } else if status == ComplianceStatus::NonCompliant || score >= CRITICAL_SCORE {
        RiskLevel::Critical
    } else if status == ComplianceStatus::Partial || score >= HIGH_SCORE {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

/// Stand-in score for answers that only carry a risk level
pub fn proxy_score(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::Critical => 5,
        _ => 3,
    }
}
