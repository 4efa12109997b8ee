pub mod accounts; // Identity provider surface: accounts, sessions, tokens
pub mod api; // REST API: router, endpoints, middleware
pub mod appointment; // Appointment scheduling + status overwrite
pub mod authorization; // Role gate + admin allow-list
pub mod config;
pub mod core_state; // Shared state: store, hub, model seam
pub mod db;
pub mod events; // Change-notification hub over the collections
pub mod genai; // Drafting / summarization / illustration pipeline
pub mod lifecycle; // Report review workflow state machine
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::genai::{GenAiClient, GenAiSettings};

/// Initialize logging, open the store, and serve the API until ctrl-c.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = GenAiSettings::from_env();
    if settings.api_key.is_none() {
        tracing::warn!("MEDICLOUD_GENAI_API_KEY not set — AI endpoints will fail until configured");
    }
    let genai = Arc::new(GenAiClient::new(settings));

    // Store unavailability is a blocking configuration error, not
    // something to limp past.
    let core = core_state::CoreState::initialize(
        &config::data_dir(),
        genai,
        config::admin_emails(),
    )
    .map_err(|e| e.to_string())?;

    let (ip, port) = config::bind_addr();
    let mut server = api::start_api_server_on(Arc::new(core), ip, port).await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))?;

    tracing::info!("shutdown requested");
    server.shutdown();
    Ok(())
}
