//! Service entry point: configuration, adapter wiring, HTTP server.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use first_tier::adapters::http::triage::{triage_router, TriageAppState};
use first_tier::adapters::{
    FileConversationStore, GoogleCalendarConfig, GoogleCalendarOracle, InMemoryConversationStore,
    OpenAiConfig, OpenAiTextOracle,
};
use first_tier::application::escalation::EscalationCoordinator;
use first_tier::application::handlers::{
    BeginTriageHandler, GetConversationHandler, SubmitAnswerHandler,
};
use first_tier::config::AppConfig;
use first_tier::ports::{ConversationStore, SchedulingOracle, TextOracle};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let oracle: Arc<dyn TextOracle> = Arc::new(OpenAiTextOracle::new(
        OpenAiConfig::new(config.ai.openai_api_key.clone().unwrap_or_default())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?);

    let scheduling: Arc<dyn SchedulingOracle> = Arc::new(GoogleCalendarOracle::new(
        GoogleCalendarConfig::new(config.calendar.access_token.clone().unwrap_or_default())
            .with_calendar_id(config.calendar.calendar_id.clone())
            .with_base_url(config.calendar.base_url.clone())
            .with_timeout(config.calendar.timeout()),
    )?);

    let store: Arc<dyn ConversationStore> = match &config.server.state_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using file-backed conversation store");
            Arc::new(FileConversationStore::new(dir.clone()).await?)
        }
        None => {
            info!("using in-memory conversation store");
            Arc::new(InMemoryConversationStore::new())
        }
    };

    let coordinator = Arc::new(
        EscalationCoordinator::new(scheduling)
            .with_slot_minutes(config.calendar.slot_minutes)
            .with_search_window_hours(config.calendar.search_window_hours),
    );

    let state = TriageAppState::new(
        Arc::new(BeginTriageHandler::new(
            oracle.clone(),
            store.clone(),
            coordinator.clone(),
        )),
        Arc::new(SubmitAnswerHandler::new(
            oracle,
            store.clone(),
            coordinator,
        )),
        Arc::new(GetConversationHandler::new(store)),
    );

    let app = triage_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(120)));

    let addr = config.server.socket_addr()?;
    info!(%addr, "first-tier listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
