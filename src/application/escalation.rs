//! EscalationCoordinator - turns a terminal dialogue outcome into one
//! scheduling request.
//!
//! The coordinator books the next free call slot inside a fixed search
//! window and returns the resulting handle (a join link). Failure to
//! schedule is an outcome, not an error: the handle stays absent, the
//! caller surfaces a "we will follow up manually" message, and the
//! conversation still closes.
//!
//! Idempotence: the dialogue engine must not escalate a conversation
//! that already carries a handle. The coordinator double-checks and
//! returns the existing handle without touching the calendar.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::conversation::{Conversation, Turn};
use crate::domain::escalation::EscalationReason;
use crate::ports::SchedulingOracle;

/// Default call length in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 15;
/// Default search window in hours.
pub const DEFAULT_SEARCH_WINDOW_HOURS: u32 = 2;

/// Everything needed to book the hand-off call.
#[derive(Debug, Clone, Copy)]
pub struct EscalationRequest<'a> {
    /// Contact handle shown in the event title.
    pub client_identifier: &'a str,
    /// Issue summary from triage.
    pub summary: &'a str,
    /// Candidate questions from triage, embedded in the description.
    pub candidate_questions: &'a [String],
    /// Why this escalation is happening.
    pub reason: EscalationReason,
    /// Dialogue history (empty for direct escalation from triage).
    pub turns: &'a [Turn],
    /// Handle from an earlier escalation, if any.
    pub existing_handle: Option<&'a str>,
}

/// Books the hand-off call for a terminal triage outcome.
pub struct EscalationCoordinator {
    scheduling: Arc<dyn SchedulingOracle>,
    slot_minutes: u32,
    search_window_hours: u32,
}

impl EscalationCoordinator {
    /// Creates a coordinator with the default 15-minute slot and 2-hour
    /// search window.
    pub fn new(scheduling: Arc<dyn SchedulingOracle>) -> Self {
        Self {
            scheduling,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            search_window_hours: DEFAULT_SEARCH_WINDOW_HOURS,
        }
    }

    /// Overrides the call length.
    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes;
        self
    }

    /// Overrides the search window.
    pub fn with_search_window_hours(mut self, hours: u32) -> Self {
        self.search_window_hours = hours;
        self
    }

    /// Attempts to schedule the call and returns the handle, or `None`
    /// when no slot was free or the calendar failed.
    pub async fn escalate(&self, request: EscalationRequest<'_>) -> Option<String> {
        if let Some(handle) = request.existing_handle {
            warn!(
                client = request.client_identifier,
                "escalation requested for a conversation that already has a handle; reusing it"
            );
            return Some(handle.to_string());
        }

        let slot = match self
            .scheduling
            .find_slot(self.slot_minutes, self.search_window_hours)
            .await
        {
            Ok(Some(slot)) => slot,
            Ok(None) => {
                info!(
                    client = request.client_identifier,
                    window_hours = self.search_window_hours,
                    "no free slot in the search window; team will follow up manually"
                );
                return None;
            }
            Err(e) => {
                error!(client = request.client_identifier, error = %e, "slot lookup failed");
                return None;
            }
        };

        let title = format!(
            "{} - Support Call: {}",
            request.reason.display_urgency(),
            request.client_identifier
        );
        let description = build_description(&request);

        match self.scheduling.create_event(&title, &description, slot).await {
            Ok(handle) => {
                info!(
                    client = request.client_identifier,
                    reason = %request.reason,
                    start = %slot.start,
                    "support call scheduled"
                );
                Some(handle)
            }
            Err(e) => {
                error!(client = request.client_identifier, error = %e, "event creation failed");
                None
            }
        }
    }

    /// Convenience wrapper that builds the request from a conversation.
    pub async fn escalate_conversation(
        &self,
        conversation: &Conversation,
        reason: EscalationReason,
    ) -> Option<String> {
        self.escalate(EscalationRequest {
            client_identifier: conversation.client_identifier(),
            summary: conversation.issue_summary(),
            candidate_questions: conversation.candidate_questions(),
            reason,
            turns: conversation.turns(),
            existing_handle: conversation.escalation_handle(),
        })
        .await
    }
}

/// Renders the event description: summary, suggested questions, and the
/// dialogue transcript.
fn build_description(request: &EscalationRequest<'_>) -> String {
    let mut description = format!(
        "{}\n\nEscalation reason: {}.\n",
        request.summary, request.reason
    );

    if !request.candidate_questions.is_empty() {
        description.push_str("\nSuggested questions to start with:\n");
        for question in request.candidate_questions {
            description.push_str(&format!("- {}\n", question));
        }
    }

    if request.turns.is_empty() {
        description.push_str("\nNo clarification dialogue took place.\n");
    } else {
        description.push_str("\nDialogue transcript:\n");
        for (i, turn) in request.turns.iter().enumerate() {
            description.push_str(&format!(
                "Q{}: {}\nA{}: {}\n",
                i + 1,
                turn.question(),
                i + 1,
                turn.answer().unwrap_or("(no answer)")
            ));
        }
    }

    description
}
