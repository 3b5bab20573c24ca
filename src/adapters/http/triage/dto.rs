//! Request/response DTOs for the triage endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{AnswerOutcome, BeginOutcome};
use crate::domain::conversation::Conversation;
use crate::domain::triage::{Sentiment, Urgency};

/// Body for `POST /api/triage`.
#[derive(Debug, Clone, Deserialize)]
pub struct BeginTriageRequest {
    /// Full text of the client email.
    pub email_text: String,
    /// Client contact handle (email address).
    pub client_email: String,
}

/// Response for `POST /api/triage`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BeginTriageResponse {
    /// High-priority issue, call requested immediately.
    Escalated {
        sentiment: Sentiment,
        urgency: Urgency,
        summary: String,
        /// Absent when no slot was free within the search window.
        meeting_link: Option<String>,
    },
    /// Client routed into the clarification dialogue.
    InDialogue {
        sentiment: Sentiment,
        urgency: Urgency,
        summary: String,
        conversation_id: String,
        question: String,
    },
}

impl From<BeginOutcome> for BeginTriageResponse {
    fn from(outcome: BeginOutcome) -> Self {
        match outcome {
            BeginOutcome::EscalatedNow {
                assessment,
                escalation_handle,
            } => Self::Escalated {
                sentiment: assessment.sentiment,
                urgency: assessment.urgency,
                summary: assessment.summary,
                meeting_link: escalation_handle,
            },
            BeginOutcome::InDialogue {
                assessment,
                conversation_id,
                question,
            } => Self::InDialogue {
                sentiment: assessment.sentiment,
                urgency: assessment.urgency,
                summary: assessment.summary,
                conversation_id: conversation_id.to_string(),
                question,
            },
        }
    }
}

/// Body for `POST /api/conversations/:id/answers`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// Response for `POST /api/conversations/:id/answers`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitAnswerResponse {
    /// The dialogue continues with a new question.
    NextQuestion { question: String },
    /// The dialogue ended and a call was scheduled (or attempted).
    Ended {
        reason: String,
        meeting_link: Option<String>,
    },
    /// Empty submission ignored; re-prompt with the pending question.
    IgnoredEmpty { question: Option<String> },
    /// The conversation was already over.
    AlreadyEnded { meeting_link: Option<String> },
    /// No question was awaiting an answer.
    NoPendingTurn,
}

impl From<AnswerOutcome> for SubmitAnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        match outcome {
            AnswerOutcome::NextQuestion { question } => Self::NextQuestion { question },
            AnswerOutcome::Ended {
                reason,
                escalation_handle,
            } => Self::Ended {
                reason: reason.to_string(),
                meeting_link: escalation_handle,
            },
            AnswerOutcome::IgnoredEmpty { pending_question } => Self::IgnoredEmpty {
                question: pending_question,
            },
            AnswerOutcome::AlreadyEnded { escalation_handle } => Self::AlreadyEnded {
                meeting_link: escalation_handle,
            },
            AnswerOutcome::NoPendingTurn => Self::NoPendingTurn,
        }
    }
}

/// One turn as shown to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub question: String,
    pub answer: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Response for `GET /api/conversations/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub conversation_id: String,
    pub client_email: String,
    pub summary: String,
    pub phase: String,
    pub terminal: bool,
    pub frustration_detected: bool,
    pub meeting_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub turns: Vec<TurnView>,
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        Self {
            conversation_id: conversation.id().to_string(),
            client_email: conversation.client_identifier().to_string(),
            summary: conversation.issue_summary().to_string(),
            phase: conversation.phase().label().to_string(),
            terminal: conversation.is_terminal(),
            frustration_detected: conversation.frustration_detected(),
            meeting_link: conversation.escalation_handle().map(str::to_string),
            created_at: conversation.created_at().to_rfc3339(),
            updated_at: conversation.updated_at().to_rfc3339(),
            turns: conversation
                .turns()
                .iter()
                .map(|t| TurnView {
                    question: t.question().to_string(),
                    answer: t.answer().map(str::to_string),
                    sentiment: t.sentiment(),
                })
                .collect(),
        }
    }
}

/// Error payload for all triage endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}
