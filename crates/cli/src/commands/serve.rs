use anyhow::Result;
use inventory_chat_http::{AppState, create_router, start_session_sweeper};
use inventory_chat_llm::{LlmClient, LlmConfig};
use inventory_chat_service::{ChatService, ChatSettings, Collaborators};
use inventory_chat_storage::PgStorage;
use std::sync::Arc;
use std::time::Duration;

use crate::get_database_url;

/// Upper bound on the sweep period so short idle TTLs are honored promptly.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let storage = Arc::new(PgStorage::new(&get_database_url()?).await?);
    let llm_config = LlmConfig::from_env()?;
    tracing::info!(base_url = %llm_config.base_url, model = %llm_config.model, "Completion service configured");
    let completion = Arc::new(LlmClient::new(llm_config)?);

    let settings = ChatSettings::from_env();
    let sweep_period = settings.session_idle_ttl.min(MAX_SWEEP_PERIOD).max(Duration::from_secs(1));
    let chat = Arc::new(ChatService::new(Collaborators::postgres(storage, completion), settings));
    start_session_sweeper(Arc::clone(&chat), sweep_period);

    let router = create_router(Arc::new(AppState::new(chat)));
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
