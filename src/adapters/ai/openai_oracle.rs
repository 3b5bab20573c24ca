//! OpenAI Oracle - Implementation of TextOracle against OpenAI's chat
//! completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-3.5-turbo")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let oracle = OpenAiTextOracle::new(config);
//! ```
//!
//! # Output normalization
//!
//! Models are instructed to return raw JSON but occasionally wrap it in
//! markdown fences or surrounding prose. `extract_json` strips fences
//! and falls back to the outermost `{...}` span before giving up with a
//! parse error.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::triage::{Sentiment, Urgency};
use crate::ports::{
    DialogueContext, FollowUpQuestion, IssueDigest, OpeningMessage, OracleError, SentimentReading,
    TextOracle, UrgencyReading,
};

use super::prompts;

/// Configuration for the OpenAI oracle.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-3.5-turbo", "gpt-4-turbo").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-backed text oracle.
pub struct OpenAiTextOracle {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiTextOracle {
    /// Creates a new oracle with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Sends a single-prompt completion and returns the raw content.
    async fn complete(&self, prompt: String) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: Some(0.2),
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    OracleError::network(format!("connection failed: {e}"))
                } else {
                    OracleError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::parse(format!("malformed completion response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OracleError::parse("completion response had no choices"))
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, OracleError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(OracleError::AuthenticationFailed),
            429 => Err(OracleError::RateLimited {
                retry_after_secs: 30,
            }),
            400 => Err(OracleError::InvalidRequest(error_body)),
            500..=599 => Err(OracleError::unavailable(format!(
                "server error {status}: {error_body}"
            ))),
            _ => Err(OracleError::network(format!(
                "unexpected status {status}: {error_body}"
            ))),
        }
    }
}

#[async_trait]
impl TextOracle for OpenAiTextOracle {
    async fn classify_sentiment(&self, text: &str) -> Result<SentimentReading, OracleError> {
        let raw = self.complete(prompts::sentiment_prompt(text)).await?;
        let payload: SentimentPayload = parse_payload(&raw)?;
        let label = payload
            .sentiment_identified
            .ok_or_else(|| OracleError::parse("missing sentiment_identified"))?;

        let mut reading = SentimentReading::new(Sentiment::parse_or_neutral(&label));
        reading.reasoning = payload.reasoning;
        Ok(reading)
    }

    async fn detect_urgency(&self, text: &str) -> Result<UrgencyReading, OracleError> {
        let raw = self.complete(prompts::urgency_prompt(text)).await?;
        let payload: UrgencyPayload = parse_payload(&raw)?;
        let label = payload
            .urgency_identified
            .ok_or_else(|| OracleError::parse("missing urgency_identified"))?;

        let mut reading = UrgencyReading::new(Urgency::parse_or_low(&label));
        reading.reasoning = payload.reasoning;
        Ok(reading)
    }

    async fn extract_issue(&self, email: &str) -> Result<IssueDigest, OracleError> {
        let raw = self.complete(prompts::issue_extraction_prompt(email)).await?;
        let payload: IssuePayload = parse_payload(&raw)?;
        let summary = payload
            .summary
            .ok_or_else(|| OracleError::parse("missing summary"))?;

        let mut digest = IssueDigest::new(summary, payload.questions.unwrap_or_default());
        digest.reasoning = payload.reasoning;
        Ok(digest)
    }

    async fn opening_question(
        &self,
        email: &str,
        candidate_questions: &[String],
    ) -> Result<OpeningMessage, OracleError> {
        let raw = self
            .complete(prompts::greeting_prompt(email, candidate_questions))
            .await?;
        let payload: QuestionPayload = parse_payload(&raw)?;
        let question = payload
            .question
            .ok_or_else(|| OracleError::parse("missing question"))?;
        Ok(OpeningMessage::new(question))
    }

    async fn next_question(
        &self,
        context: DialogueContext<'_>,
    ) -> Result<FollowUpQuestion, OracleError> {
        let raw = self
            .complete(prompts::next_question_prompt(
                context.email,
                context.candidate_questions,
                context.turns,
            ))
            .await?;
        let payload: QuestionPayload = parse_payload(&raw)?;
        let question = payload
            .question
            .ok_or_else(|| OracleError::parse("missing question"))?;

        let mut follow_up = FollowUpQuestion::new(question);
        follow_up.reasoning = payload.reasoning;
        Ok(follow_up)
    }
}

/// Extracts a JSON object from possibly fenced or prose-wrapped model
/// output and deserializes it.
fn parse_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    let value = extract_json(raw)?;
    serde_json::from_value(value).map_err(|e| OracleError::parse(e.to_string()))
}

/// Normalizes free-form model output into a JSON value.
///
/// Tries, in order: the text as-is, the text with markdown fences
/// stripped, then the outermost `{...}` span.
fn extract_json(raw: &str) -> Result<serde_json::Value, OracleError> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced.trim()) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&unfenced[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(OracleError::parse(format!(
        "no JSON object found in oracle output: {}",
        truncate(trimmed, 120)
    )))
}

/// Removes a surrounding ``` fence (with optional language tag) if present.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, e.g. "json".
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct SentimentPayload {
    sentiment_identified: Option<String>,
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrgencyPayload {
    urgency_identified: Option<String>,
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    summary: Option<String>,
    questions: Option<Vec<String>>,
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    question: Option<String>,
    reasoning: Option<String>,
}
