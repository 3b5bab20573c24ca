//! A single question/answer exchange.

use serde::{Deserialize, Serialize};

use crate::domain::triage::Sentiment;

/// One question/answer exchange in a clarification dialogue.
///
/// The question is fixed at creation. The answer and its classified
/// sentiment are written together, exactly once; a turn without an
/// answer is "pending".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    question: String,
    answer: Option<String>,
    sentiment: Option<Sentiment>,
}

impl Turn {
    /// Creates a pending turn for a freshly asked question.
    pub(crate) fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
            sentiment: None,
        }
    }

    /// The question that was asked.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The respondent's answer, if one has been recorded.
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// The sentiment classified from the answer, if recorded.
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    /// Returns true while the turn is waiting for an answer.
    pub fn is_pending(&self) -> bool {
        self.answer.is_none()
    }

    /// Writes answer and sentiment together. Returns false if the turn
    /// was already answered (the write-once rule).
    pub(crate) fn record(&mut self, answer: String, sentiment: Sentiment) -> bool {
        if self.answer.is_some() {
            return false;
        }
        self.answer = Some(answer);
        self.sentiment = Some(sentiment);
        true
    }
}
