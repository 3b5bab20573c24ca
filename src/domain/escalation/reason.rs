//! Why a conversation is being escalated to a human call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::triage::Urgency;

/// The trigger that ended a dialogue (or bypassed it entirely).
///
/// The display urgency is derived from the reason; the frustration flag
/// on the conversation stays a plain boolean and is never compared
/// against label strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EscalationReason {
    /// A dialogue answer classified as angry or frustrated.
    FrustrationDetected,
    /// The dialogue used up its question budget.
    BudgetExhausted,
    /// Initial triage crossed the sentiment/urgency threshold;
    /// no dialogue took place.
    InitialTriage { urgency: Urgency },
}

impl EscalationReason {
    /// Urgency label shown on the scheduled call. Display only.
    pub fn display_urgency(&self) -> Urgency {
        match self {
            Self::FrustrationDetected => Urgency::High,
            Self::BudgetExhausted => Urgency::Medium,
            Self::InitialTriage { urgency } => *urgency,
        }
    }
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FrustrationDetected => "frustration detected",
            Self::BudgetExhausted => "question budget exhausted",
            Self::InitialTriage { .. } => "initial triage: sentiment/urgency threshold",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frustration_displays_as_high() {
        assert_eq!(
            EscalationReason::FrustrationDetected.display_urgency(),
            Urgency::High
        );
    }

    #[test]
    fn budget_displays_as_medium() {
        assert_eq!(
            EscalationReason::BudgetExhausted.display_urgency(),
            Urgency::Medium
        );
    }

    #[test]
    fn initial_triage_keeps_the_classified_urgency() {
        let reason = EscalationReason::InitialTriage {
            urgency: Urgency::Critical,
        };
        assert_eq!(reason.display_urgency(), Urgency::Critical);
    }

    #[test]
    fn reason_strings_are_stable() {
        assert_eq!(
            EscalationReason::FrustrationDetected.to_string(),
            "frustration detected"
        );
        assert_eq!(
            EscalationReason::BudgetExhausted.to_string(),
            "question budget exhausted"
        );
    }
}
