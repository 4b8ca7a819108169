//! CRM notes server
//!
//! Serves the contact notes API backed by SQLite.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crm_notes::{api, config, AppState, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::init();
    crm_notes::init_tracing(config.logging.format);

    tracing::info!(
        "Starting CRM notes server on {}:{}",
        config.server.host,
        config.server.port
    );

    // Initialize application state
    let state = AppState::new().await?;
    tracing::info!("Application state initialized");

    let app = api::router(state, config.server.request_timeout);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            crm_notes::Error::Config(format!(
                "invalid bind address {}:{}: {}",
                config.server.host, config.server.port, e
            ))
        })?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
