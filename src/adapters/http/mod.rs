//! HTTP adapters (Axum routers and handlers).

pub mod triage;
