pub mod api;
pub mod assistant;
pub mod config;
pub mod core_state;
pub mod dashboard;
pub mod export;
pub mod history;
pub mod models;
pub mod navigation;
pub mod pipeline;
pub mod review;
pub mod store;
pub mod templates;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;

/// Start DocuDesk: initialize logging, serve the API until Ctrl+C.
pub fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        bind = %config.bind_addr,
        ocr_delay_ms = config::whole_millis(config.ocr_delay),
        assistant_delay_ms = config::whole_millis(config.assistant_delay),
        "{} starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    runtime.block_on(async move {
        let addr = config.bind_addr;
        let core = Arc::new(CoreState::new(config));
        let mut server = api::start_api_server(core, addr).await?;

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }
        server.shutdown();
        Ok(())
    })
}
