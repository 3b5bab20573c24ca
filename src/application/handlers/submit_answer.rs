//! SubmitAnswerHandler - record one answer and advance the dialogue.
//!
//! The single suspension point of the system: each call consumes one
//! respondent answer, runs the termination policy, and returns either
//! the next pending question or the final escalation outcome. Control
//! then goes back to the caller until the next answer arrives.
//!
//! Oracle transport failures surface before anything is persisted, so a
//! retried submission starts from the exact same state.

use std::sync::Arc;
use tracing::warn;

use crate::application::escalation::EscalationCoordinator;
use crate::domain::conversation::{
    AskOutcome, Conversation, DialogueEngine, RecordOutcome, Verdict,
};
use crate::domain::escalation::EscalationReason;
use crate::domain::foundation::ConversationId;
use crate::domain::triage::Sentiment;
use crate::ports::{ConversationStore, DialogueContext, OracleError, StoreError, TextOracle};

/// Command to submit a respondent answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub conversation_id: ConversationId,
    pub answer: String,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Answer recorded; a new question is pending.
    NextQuestion { question: String },
    /// Answer recorded; the dialogue terminated and scheduling ran.
    Ended {
        reason: EscalationReason,
        /// Join handle, absent when no slot was free or booking failed.
        escalation_handle: Option<String>,
    },
    /// Empty or whitespace-only submission; nothing changed. The caller
    /// should re-prompt with the still-pending question.
    IgnoredEmpty { pending_question: Option<String> },
    /// The conversation had already ended; the submission was ignored.
    AlreadyEnded {
        escalation_handle: Option<String>,
    },
    /// No question is awaiting an answer; the submission was ignored.
    NoPendingTurn,
}

/// Error type for submitting answers.
#[derive(Debug, thiserror::Error)]
pub enum SubmitAnswerError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SubmitAnswerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SubmitAnswerError::NotFound(id),
            other => SubmitAnswerError::Store(other),
        }
    }
}

/// Handler for the answer-submission entry point.
pub struct SubmitAnswerHandler {
    oracle: Arc<dyn TextOracle>,
    store: Arc<dyn ConversationStore>,
    coordinator: Arc<EscalationCoordinator>,
    engine: DialogueEngine,
}

impl SubmitAnswerHandler {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        store: Arc<dyn ConversationStore>,
        coordinator: Arc<EscalationCoordinator>,
    ) -> Self {
        Self {
            oracle,
            store,
            coordinator,
            engine: DialogueEngine::new(),
        }
    }

    pub async fn handle(&self, cmd: SubmitAnswerCommand) -> Result<AnswerOutcome, SubmitAnswerError> {
        let mut conversation = self.store.load(cmd.conversation_id).await?;

        // Contract violations from out-of-order callers degrade to no-ops.
        if conversation.is_terminal() {
            warn!(
                conversation_id = %conversation.id(),
                "answer submitted to an ended conversation"
            );
            return Ok(AnswerOutcome::AlreadyEnded {
                escalation_handle: conversation.escalation_handle().map(str::to_string),
            });
        }
        if cmd.answer.trim().is_empty() {
            return Ok(AnswerOutcome::IgnoredEmpty {
                pending_question: conversation.pending_question().map(str::to_string),
            });
        }
        if conversation.pending_turn().is_none() {
            warn!(
                conversation_id = %conversation.id(),
                "answer submitted with no pending turn"
            );
            return Ok(AnswerOutcome::NoPendingTurn);
        }

        // Classify before mutating; a failed classification leaves the
        // stored conversation untouched.
        let sentiment = match self.oracle.classify_sentiment(&cmd.answer).await {
            Ok(reading) => reading.sentiment,
            Err(e) if e.is_parse() => {
                warn!(error = %e, "answer sentiment unparseable, defaulting to Neutral");
                Sentiment::Neutral
            }
            Err(e) => return Err(e.into()),
        };

        match conversation.record_answer(&cmd.answer, sentiment) {
            RecordOutcome::Recorded { .. } => {}
            // Checked above; kept as a defensive no-op mapping.
            RecordOutcome::IgnoredEmpty => {
                return Ok(AnswerOutcome::IgnoredEmpty {
                    pending_question: conversation.pending_question().map(str::to_string),
                })
            }
            RecordOutcome::NoPendingTurn => return Ok(AnswerOutcome::NoPendingTurn),
            RecordOutcome::AlreadyEnded => {
                return Ok(AnswerOutcome::AlreadyEnded {
                    escalation_handle: conversation.escalation_handle().map(str::to_string),
                })
            }
        }

        match self.engine.decide(&mut conversation) {
            Verdict::AskAnother => {
                let question = self.generate_question(&mut conversation).await?;
                self.store.save(&conversation).await?;
                Ok(AnswerOutcome::NextQuestion { question })
            }
            Verdict::Escalate(reason) => {
                let handle = self
                    .coordinator
                    .escalate_conversation(&conversation, reason)
                    .await;
                conversation.complete_escalation(handle);
                self.store.save(&conversation).await?;
                Ok(AnswerOutcome::Ended {
                    reason,
                    escalation_handle: conversation.escalation_handle().map(str::to_string),
                })
            }
        }
    }

    /// Generates and appends the next question, retrying exactly once if
    /// the oracle echoes an already-asked question, then accepting
    /// whatever comes back to avoid an infinite retry loop.
    async fn generate_question(
        &self,
        conversation: &mut Conversation,
    ) -> Result<String, SubmitAnswerError> {
        let first = self
            .oracle
            .next_question(DialogueContext {
                email: conversation.subject_email(),
                candidate_questions: conversation.candidate_questions(),
                turns: conversation.turns(),
            })
            .await?;

        match conversation.ask(first.question.clone()) {
            AskOutcome::Asked => return Ok(first.question),
            AskOutcome::DuplicateQuestion => {
                warn!(
                    conversation_id = %conversation.id(),
                    "oracle repeated an asked question, retrying once"
                );
            }
            other => {
                warn!(conversation_id = %conversation.id(), ?other, "unexpected ask outcome");
                return Ok(first.question);
            }
        }

        let second = self
            .oracle
            .next_question(DialogueContext {
                email: conversation.subject_email(),
                candidate_questions: conversation.candidate_questions(),
                turns: conversation.turns(),
            })
            .await?;

        if conversation.ask(second.question.clone()) == AskOutcome::DuplicateQuestion {
            conversation.ask_allowing_repeat(second.question.clone());
        }
        Ok(second.question)
    }
}
