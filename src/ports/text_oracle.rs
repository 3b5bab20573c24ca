//! Text Oracle Port - Interface for the text classification/generation
//! collaborator.
//!
//! The oracle classifies sentiment and urgency, summarizes issues, and
//! generates dialogue questions. Implementations talk to an LLM provider
//! and normalize its free-form output (code fences and all) into the
//! typed results below.
//!
//! # Design
//!
//! - One method per classification kind, all synchronous request/response
//! - Results are typed; unparseable model output surfaces as
//!   `OracleError::Parse` so callers can degrade to safe defaults
//! - Timeouts are the implementation's responsibility and surface as
//!   `OracleError::Timeout`; a hung oracle must never wedge a dialogue

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::Turn;
use crate::domain::triage::{Sentiment, Urgency};

/// Port for text classification and question generation.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Classifies the emotional tone of a piece of client text.
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentReading, OracleError>;

    /// Classifies how time-critical an email is.
    async fn detect_urgency(&self, text: &str) -> Result<UrgencyReading, OracleError>;

    /// Summarizes the issue and proposes candidate clarification questions.
    async fn extract_issue(&self, email: &str) -> Result<IssueDigest, OracleError>;

    /// Produces the greeting and opening clarification question for a
    /// new dialogue.
    async fn opening_question(
        &self,
        email: &str,
        candidate_questions: &[String],
    ) -> Result<OpeningMessage, OracleError>;

    /// Produces one new, non-redundant follow-up question given the
    /// dialogue so far. Non-redundancy is the oracle's responsibility;
    /// the engine only rejects exact duplicates.
    async fn next_question(&self, context: DialogueContext<'_>) -> Result<FollowUpQuestion, OracleError>;
}

/// Everything the oracle may consider when generating a follow-up.
#[derive(Debug, Clone, Copy)]
pub struct DialogueContext<'a> {
    /// The original client email.
    pub email: &'a str,
    /// Candidate questions proposed at triage time.
    pub candidate_questions: &'a [String],
    /// Full turn history, oldest first.
    pub turns: &'a [Turn],
}

/// A sentiment classification with the oracle's reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    pub reasoning: Option<String>,
}

impl SentimentReading {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            sentiment,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// An urgency classification with the oracle's reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyReading {
    pub urgency: Urgency,
    pub reasoning: Option<String>,
}

impl UrgencyReading {
    pub fn new(urgency: Urgency) -> Self {
        Self {
            urgency,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// Issue summary plus candidate clarification questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDigest {
    pub summary: String,
    pub questions: Vec<String>,
    pub reasoning: Option<String>,
}

impl IssueDigest {
    pub fn new(summary: impl Into<String>, questions: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            questions,
            reasoning: None,
        }
    }
}

/// Greeting plus first clarification question, delivered as one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningMessage {
    pub question: String,
}

impl OpeningMessage {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// A generated follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub question: String,
    pub reasoning: Option<String>,
}

impl FollowUpQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            reasoning: None,
        }
    }
}

/// Text oracle errors.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Request timed out.
    #[error("oracle request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Provider is unavailable.
    #[error("oracle unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Rate limited by provider.
    #[error("oracle rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Network error during request.
    #[error("oracle network error: {0}")]
    Network(String),

    /// Model output could not be normalized into the expected structure.
    #[error("oracle parse error: {0}")]
    Parse(String),

    /// API key or authentication failed.
    #[error("oracle authentication failed")]
    AuthenticationFailed,

    /// Invalid request configuration.
    #[error("invalid oracle request: {0}")]
    InvalidRequest(String),
}

impl OracleError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OracleError::Timeout { .. }
                | OracleError::Unavailable { .. }
                | OracleError::RateLimited { .. }
                | OracleError::Network(_)
        )
    }

    /// Returns true for output-shape failures that callers degrade from
    /// instead of surfacing.
    pub fn is_parse(&self) -> bool {
        matches!(self, OracleError::Parse(_))
    }
}
