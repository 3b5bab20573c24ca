//! HTTP surface for the triage entry points.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::TriageAppState;
pub use routes::triage_router;
