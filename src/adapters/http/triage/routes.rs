//! Route configuration for triage endpoints.
//!
//! Configures the Axum router with the conversation entry points.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{begin_triage, get_conversation, submit_answer, TriageAppState};

/// Creates the triage router.
///
/// Routes:
/// - `POST /api/triage` - classify an email, escalate or open a dialogue
/// - `POST /api/conversations/:id/answers` - submit one answer
/// - `GET /api/conversations/:id` - current dialogue state
pub fn triage_router() -> Router<TriageAppState> {
    Router::new()
        .route("/api/triage", post(begin_triage))
        .route("/api/conversations/:id/answers", post(submit_answer))
        .route("/api/conversations/:id", get(get_conversation))
}
