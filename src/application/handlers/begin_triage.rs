//! BeginTriageHandler - classify an inbound email and route it.
//!
//! One-shot triage: classify sentiment and urgency, extract the issue
//! digest, then either escalate straight to a scheduled call or open a
//! clarification dialogue with its first question already asked.
//!
//! Classification parse failures degrade to non-escalating defaults and
//! are logged; they never block triage. Transport-level oracle failures
//! (timeout, unavailable) surface to the caller with no state written.

use std::sync::Arc;
use tracing::warn;

use crate::application::escalation::{EscalationCoordinator, EscalationRequest};
use crate::domain::conversation::{AskOutcome, Conversation};
use crate::domain::escalation::EscalationReason;
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::domain::triage::{Sentiment, TriageAssessment, Urgency};
use crate::ports::{ConversationStore, OracleError, StoreError, TextOracle};

/// Command to triage an inbound email.
#[derive(Debug, Clone)]
pub struct BeginTriageCommand {
    /// Full text of the client email.
    pub email_text: String,
    /// Contact handle for the escalation artifact.
    pub client_identifier: String,
}

/// Result of triaging an email.
#[derive(Debug, Clone)]
pub enum BeginOutcome {
    /// Sentiment/urgency crossed the threshold; a call was requested
    /// immediately with an empty dialogue history.
    EscalatedNow {
        assessment: TriageAssessment,
        /// Join handle, absent when scheduling found no slot or failed.
        escalation_handle: Option<String>,
    },
    /// A clarification dialogue was opened; its first question is
    /// awaiting an answer.
    InDialogue {
        assessment: TriageAssessment,
        conversation_id: ConversationId,
        question: String,
    },
}

/// Error type for beginning triage.
#[derive(Debug, thiserror::Error)]
pub enum BeginTriageError {
    #[error("email text is empty")]
    EmptyEmail,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Handler for the triage entry point.
pub struct BeginTriageHandler {
    oracle: Arc<dyn TextOracle>,
    store: Arc<dyn ConversationStore>,
    coordinator: Arc<EscalationCoordinator>,
}

impl BeginTriageHandler {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        store: Arc<dyn ConversationStore>,
        coordinator: Arc<EscalationCoordinator>,
    ) -> Self {
        Self {
            oracle,
            store,
            coordinator,
        }
    }

    pub async fn handle(&self, cmd: BeginTriageCommand) -> Result<BeginOutcome, BeginTriageError> {
        let email = cmd.email_text.trim();
        if email.is_empty() {
            return Err(BeginTriageError::EmptyEmail);
        }

        let assessment = self.assess(email).await?;

        if assessment.requires_immediate_escalation() {
            let reason = EscalationReason::InitialTriage {
                urgency: assessment.urgency,
            };
            let escalation_handle = self
                .coordinator
                .escalate(EscalationRequest {
                    client_identifier: &cmd.client_identifier,
                    summary: &assessment.summary,
                    candidate_questions: &assessment.questions,
                    reason,
                    turns: &[],
                    existing_handle: None,
                })
                .await;

            return Ok(BeginOutcome::EscalatedNow {
                assessment,
                escalation_handle,
            });
        }

        let mut conversation = Conversation::new(
            email,
            cmd.client_identifier,
            assessment.summary.clone(),
            assessment.questions.clone(),
        )?;

        let question = self.opening_question(&conversation).await?;
        if conversation.ask(question.clone()) != AskOutcome::Asked {
            // A fresh conversation always accepts its first question.
            warn!(conversation_id = %conversation.id(), "opening question rejected");
        }
        self.store.save(&conversation).await?;

        Ok(BeginOutcome::InDialogue {
            assessment,
            conversation_id: conversation.id(),
            question,
        })
    }

    /// Runs the three classification calls, degrading parse failures to
    /// the non-escalating defaults.
    async fn assess(&self, email: &str) -> Result<TriageAssessment, BeginTriageError> {
        let sentiment = match self.oracle.classify_sentiment(email).await {
            Ok(reading) => reading,
            Err(e) if e.is_parse() => {
                warn!(error = %e, "sentiment output unparseable, defaulting to Neutral");
                crate::ports::SentimentReading::new(Sentiment::Neutral)
            }
            Err(e) => return Err(e.into()),
        };

        let urgency = match self.oracle.detect_urgency(email).await {
            Ok(reading) => reading,
            Err(e) if e.is_parse() => {
                warn!(error = %e, "urgency output unparseable, defaulting to Low");
                crate::ports::UrgencyReading::new(Urgency::Low)
            }
            Err(e) => return Err(e.into()),
        };

        let digest = match self.oracle.extract_issue(email).await {
            Ok(digest) => digest,
            Err(e) if e.is_parse() => {
                warn!(error = %e, "issue digest unparseable, continuing without questions");
                crate::ports::IssueDigest::new("(summary unavailable)", Vec::new())
            }
            Err(e) => return Err(e.into()),
        };

        let mut assessment = TriageAssessment::new(
            sentiment.sentiment,
            urgency.urgency,
            digest.summary,
            digest.questions,
        );
        assessment.reasoning = sentiment.reasoning.or(urgency.reasoning).or(digest.reasoning);
        Ok(assessment)
    }

    /// Fetches the greeting/first question. If the oracle's output is
    /// unparseable, falls back to the first candidate question rather
    /// than blocking the dialogue.
    async fn opening_question(&self, conversation: &Conversation) -> Result<String, BeginTriageError> {
        match self
            .oracle
            .opening_question(conversation.subject_email(), conversation.candidate_questions())
            .await
        {
            Ok(opening) => Ok(opening.question),
            Err(e) if e.is_parse() => {
                if let Some(first) = conversation.candidate_questions().first() {
                    warn!(error = %e, "opening question unparseable, using first candidate");
                    Ok(first.clone())
                } else {
                    Err(e.into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}
