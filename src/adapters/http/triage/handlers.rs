//! Axum handlers for the triage endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::application::handlers::{
    BeginTriageCommand, BeginTriageError, BeginTriageHandler, GetConversationError,
    GetConversationHandler, SubmitAnswerCommand, SubmitAnswerError, SubmitAnswerHandler,
};
use crate::domain::foundation::ConversationId;
use crate::ports::OracleError;

use super::dto::{
    BeginTriageRequest, BeginTriageResponse, ConversationView, ErrorBody, SubmitAnswerRequest,
    SubmitAnswerResponse,
};

/// Shared state for the triage routes.
#[derive(Clone)]
pub struct TriageAppState {
    begin: Arc<BeginTriageHandler>,
    submit: Arc<SubmitAnswerHandler>,
    get: Arc<GetConversationHandler>,
}

impl TriageAppState {
    pub fn new(
        begin: Arc<BeginTriageHandler>,
        submit: Arc<SubmitAnswerHandler>,
        get: Arc<GetConversationHandler>,
    ) -> Self {
        Self { begin, submit, get }
    }
}

/// API error mapped onto HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Transient upstream failure; the client should retry.
    Transient(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Transient(msg) => (StatusCode::SERVICE_UNAVAILABLE, "TRY_AGAIN", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

fn oracle_error(e: OracleError) -> ApiError {
    if e.is_retryable() {
        ApiError::Transient("the assistant is temporarily unavailable, please retry".to_string())
    } else {
        ApiError::Internal(e.to_string())
    }
}

impl From<BeginTriageError> for ApiError {
    fn from(err: BeginTriageError) -> Self {
        match err {
            BeginTriageError::EmptyEmail => ApiError::BadRequest("email text is empty".to_string()),
            BeginTriageError::Validation(e) => ApiError::BadRequest(e.to_string()),
            BeginTriageError::Oracle(e) => oracle_error(e),
            BeginTriageError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SubmitAnswerError> for ApiError {
    fn from(err: SubmitAnswerError) -> Self {
        match err {
            SubmitAnswerError::NotFound(id) => {
                ApiError::NotFound(format!("conversation not found: {id}"))
            }
            SubmitAnswerError::Oracle(e) => oracle_error(e),
            SubmitAnswerError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GetConversationError> for ApiError {
    fn from(err: GetConversationError) -> Self {
        match err {
            GetConversationError::NotFound(id) => {
                ApiError::NotFound(format!("conversation not found: {id}"))
            }
            GetConversationError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

fn parse_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid conversation id: {raw}")))
}

/// `POST /api/triage` - analyze an email and route the client.
pub async fn begin_triage(
    State(state): State<TriageAppState>,
    Json(request): Json<BeginTriageRequest>,
) -> Result<Json<BeginTriageResponse>, ApiError> {
    let outcome = state
        .begin
        .handle(BeginTriageCommand {
            email_text: request.email_text,
            client_identifier: request.client_email,
        })
        .await?;
    Ok(Json(outcome.into()))
}

/// `POST /api/conversations/:id/answers` - submit one answer.
pub async fn submit_answer(
    State(state): State<TriageAppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let outcome = state
        .submit
        .handle(SubmitAnswerCommand {
            conversation_id: parse_id(&id)?,
            answer: request.answer,
        })
        .await?;
    Ok(Json(outcome.into()))
}

/// `GET /api/conversations/:id` - current dialogue state.
pub async fn get_conversation(
    State(state): State<TriageAppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>, ApiError> {
    let conversation = state.get.handle(parse_id(&id)?).await?;
    Ok(Json(ConversationView::from(&conversation)))
}
