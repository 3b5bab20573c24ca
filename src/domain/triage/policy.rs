//! Initial triage of an inbound email.
//!
//! The triage decision is a pure function of the two classification
//! outputs: heated sentiment or pressing urgency escalates straight to
//! a scheduled call, everything else enters the clarification dialogue.

use serde::{Deserialize, Serialize};

use super::classification::{Sentiment, Urgency};

/// Decides whether an email escalates immediately.
///
/// No dialogue state is involved; this only looks at the classifications.
pub fn escalate_now(sentiment: Sentiment, urgency: Urgency) -> bool {
    sentiment.is_heated() || urgency.is_pressing()
}

/// The combined result of classifying an inbound email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageAssessment {
    /// Emotional tone of the email.
    pub sentiment: Sentiment,
    /// How time-critical the issue is.
    pub urgency: Urgency,
    /// One-paragraph issue summary.
    pub summary: String,
    /// Candidate clarification questions suggested by the oracle.
    pub questions: Vec<String>,
    /// Oracle reasoning, kept for the escalation description.
    pub reasoning: Option<String>,
}

impl TriageAssessment {
    /// Creates an assessment.
    pub fn new(
        sentiment: Sentiment,
        urgency: Urgency,
        summary: impl Into<String>,
        questions: Vec<String>,
    ) -> Self {
        Self {
            sentiment,
            urgency,
            summary: summary.into(),
            questions,
            reasoning: None,
        }
    }

    /// Attaches the oracle's reasoning text.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Returns true if this email must skip the dialogue and escalate.
    pub fn requires_immediate_escalation(&self) -> bool {
        escalate_now(self.sentiment, self.urgency)
    }
}
