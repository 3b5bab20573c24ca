//! Mock Text Oracle for testing.
//!
//! Configurable implementation of the TextOracle port so tests run
//! without a live model.
//!
//! # Features
//!
//! - Scripted responses per method, consumed in order
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let oracle = MockTextOracle::new()
//!     .with_sentiment(Sentiment::Angry)
//!     .with_followup("Which account is affected?");
//!
//! let reading = oracle.classify_sentiment("furious email").await?;
//! assert_eq!(reading.sentiment, Sentiment::Angry);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::triage::{Sentiment, Urgency};
use crate::ports::{
    DialogueContext, FollowUpQuestion, IssueDigest, OpeningMessage, OracleError, SentimentReading,
    TextOracle, UrgencyReading,
};

/// Clonable error stand-ins for scripting failures.
#[derive(Debug, Clone)]
pub enum MockOracleError {
    Timeout { timeout_secs: u32 },
    Unavailable { message: String },
    Network { message: String },
    Parse { message: String },
    AuthenticationFailed,
}

impl From<MockOracleError> for OracleError {
    fn from(err: MockOracleError) -> Self {
        match err {
            MockOracleError::Timeout { timeout_secs } => OracleError::Timeout { timeout_secs },
            MockOracleError::Unavailable { message } => OracleError::unavailable(message),
            MockOracleError::Network { message } => OracleError::network(message),
            MockOracleError::Parse { message } => OracleError::parse(message),
            MockOracleError::AuthenticationFailed => OracleError::AuthenticationFailed,
        }
    }
}

/// A recorded oracle invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleCall {
    ClassifySentiment(String),
    DetectUrgency(String),
    ExtractIssue(String),
    OpeningQuestion(String),
    NextQuestion { turn_count: usize },
}

type Script<T> = Arc<Mutex<VecDeque<Result<T, MockOracleError>>>>;

/// Mock text oracle with per-method scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockTextOracle {
    sentiments: Script<SentimentReading>,
    urgencies: Script<UrgencyReading>,
    digests: Script<IssueDigest>,
    openings: Script<OpeningMessage>,
    followups: Script<FollowUpQuestion>,
    calls: Arc<Mutex<Vec<OracleCall>>>,
}

impl MockTextOracle {
    /// Creates a mock with empty scripts; every method falls back to a
    /// benign default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sentiment classification.
    pub fn with_sentiment(self, sentiment: Sentiment) -> Self {
        self.sentiments
            .lock()
            .unwrap()
            .push_back(Ok(SentimentReading::new(sentiment)));
        self
    }

    /// Queues a sentiment classification failure.
    pub fn with_sentiment_error(self, error: MockOracleError) -> Self {
        self.sentiments.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues an urgency classification.
    pub fn with_urgency(self, urgency: Urgency) -> Self {
        self.urgencies
            .lock()
            .unwrap()
            .push_back(Ok(UrgencyReading::new(urgency)));
        self
    }

    /// Queues an urgency classification failure.
    pub fn with_urgency_error(self, error: MockOracleError) -> Self {
        self.urgencies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues an issue digest.
    pub fn with_digest(self, digest: IssueDigest) -> Self {
        self.digests.lock().unwrap().push_back(Ok(digest));
        self
    }

    /// Queues an issue extraction failure.
    pub fn with_digest_error(self, error: MockOracleError) -> Self {
        self.digests.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues an opening message.
    pub fn with_opening(self, question: impl Into<String>) -> Self {
        self.openings
            .lock()
            .unwrap()
            .push_back(Ok(OpeningMessage::new(question)));
        self
    }

    /// Queues an opening generation failure.
    pub fn with_opening_error(self, error: MockOracleError) -> Self {
        self.openings.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a follow-up question.
    pub fn with_followup(self, question: impl Into<String>) -> Self {
        self.followups
            .lock()
            .unwrap()
            .push_back(Ok(FollowUpQuestion::new(question)));
        self
    }

    /// Queues a follow-up generation failure.
    pub fn with_followup_error(self, error: MockOracleError) -> Self {
        self.followups.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns the number of calls made to this oracle.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls in order.
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: OracleCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn pop<T>(script: &Script<T>) -> Option<Result<T, MockOracleError>> {
        script.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl TextOracle for MockTextOracle {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentReading, OracleError> {
        self.record(OracleCall::ClassifySentiment(text.to_string()));
        match Self::pop(&self.sentiments) {
            Some(Ok(reading)) => Ok(reading),
            Some(Err(err)) => Err(err.into()),
            None => Ok(SentimentReading::new(Sentiment::Neutral)),
        }
    }

    async fn detect_urgency(&self, text: &str) -> Result<UrgencyReading, OracleError> {
        self.record(OracleCall::DetectUrgency(text.to_string()));
        match Self::pop(&self.urgencies) {
            Some(Ok(reading)) => Ok(reading),
            Some(Err(err)) => Err(err.into()),
            None => Ok(UrgencyReading::new(Urgency::Low)),
        }
    }

    async fn extract_issue(&self, email: &str) -> Result<IssueDigest, OracleError> {
        self.record(OracleCall::ExtractIssue(email.to_string()));
        match Self::pop(&self.digests) {
            Some(Ok(digest)) => Ok(digest),
            Some(Err(err)) => Err(err.into()),
            None => Ok(IssueDigest::new(
                "Mock issue summary",
                vec![
                    "When did the problem start?".to_string(),
                    "Which account is affected?".to_string(),
                    "What error message do you see?".to_string(),
                    "Has anything changed recently?".to_string(),
                    "Can you reproduce it reliably?".to_string(),
                ],
            )),
        }
    }

    async fn opening_question(
        &self,
        email: &str,
        _candidate_questions: &[String],
    ) -> Result<OpeningMessage, OracleError> {
        self.record(OracleCall::OpeningQuestion(email.to_string()));
        match Self::pop(&self.openings) {
            Some(Ok(message)) => Ok(message),
            Some(Err(err)) => Err(err.into()),
            None => Ok(OpeningMessage::new(
                "Thank you for contacting us. To start: when did the problem first appear?",
            )),
        }
    }

    async fn next_question(
        &self,
        context: DialogueContext<'_>,
    ) -> Result<FollowUpQuestion, OracleError> {
        let turn_count = context.turns.len();
        self.record(OracleCall::NextQuestion { turn_count });
        match Self::pop(&self.followups) {
            Some(Ok(question)) => Ok(question),
            Some(Err(err)) => Err(err.into()),
            // Vary the default by history length so consecutive defaults
            // never collide with the duplicate check.
            None => Ok(FollowUpQuestion::new(format!(
                "Could you share a bit more detail? (follow-up {})",
                turn_count
            ))),
        }
    }
}
