//! Maps a raw selected answer option to a compliance status

use shared_types::ComplianceStatus;
use tracing::debug;

use crate::patterns::{
    in_vocabulary, normalize_option, AFFIRMATIVE_OPTIONS, HEDGE_OPTIONS, NEGATIVE_OPTIONS,
};

/// Which vocabulary an answer option falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionClass {
    Affirmative,
    Hedge,
    Negative,
    /// Not in any known vocabulary
    Unrecognized,
}

impl OptionClass {
    pub fn of(option: &str) -> Self {
        let normalized = normalize_option(option);
        if in_vocabulary(&normalized, AFFIRMATIVE_OPTIONS) {
            OptionClass::Affirmative
        } else if in_vocabulary(&normalized, HEDGE_OPTIONS) {
            OptionClass::Hedge
        } else if in_vocabulary(&normalized, NEGATIVE_OPTIONS) {
            OptionClass::Negative
        } else {
            OptionClass::Unrecognized
        }
    }

    /// Unrecognized options are treated as partially compliant
    pub fn status(self) -> ComplianceStatus {
        match self {
            OptionClass::Affirmative => ComplianceStatus::Compliant,
            OptionClass::Hedge | OptionClass::Unrecognized => ComplianceStatus::Partial,
            OptionClass::Negative => ComplianceStatus::NonCompliant,
        }
    }
}

/// Classify the option selected for a question
pub fn classify(question_id: &str, selected_option: &str) -> ComplianceStatus {
    let class = OptionClass::of(selected_option);
    if class == OptionClass::Unrecognized {
        debug!(
            question_id,
            selected_option, "unrecognized answer option, classifying as PARTIAL"
        );
    }
    class.status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_options_are_compliant() {
        assert_eq!(classify("q", "yes"), ComplianceStatus::Compliant);
        assert_eq!(classify("q", "Yes - Current"), ComplianceStatus::Compliant);
        assert_eq!(classify("q", "routine"), ComplianceStatus::Compliant);
    }

    #[test]
    fn test_hedge_options_are_partial() {
        assert_eq!(classify("q", "partial"), ComplianceStatus::Partial);
        assert_eq!(classify("q", "informal"), ComplianceStatus::Partial);
        assert_eq!(classify("q", "yes_outdated"), ComplianceStatus::Partial);
        assert_eq!(classify("q", "Yes, occasionally"), ComplianceStatus::Partial);
    }

    #[test]
    fn test_plain_negative_is_non_compliant() {
        assert_eq!(classify("q", "no"), ComplianceStatus::NonCompliant);
        assert_eq!(classify("q", "NO"), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_unknown_option_defaults_to_partial() {
        assert_eq!(OptionClass::of("not sure"), OptionClass::Unrecognized);
        assert_eq!(classify("q", "not sure"), ComplianceStatus::Partial);
        assert_eq!(classify("q", ""), ComplianceStatus::Partial);
    }
}
