//! # Discount Code Service
//!
//! Process entry point: configuration, logging, catalog, listener, server.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use discount_code_service::{serve, telemetry, AppState, ServiceConfig, ServiceError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.log)?;

    info!("Starting Discount Code Service...");

    let catalog = config
        .load_catalog()
        .context("Failed to load discount codes")?;
    info!(
        codes = ?catalog.codes(),
        source = %config
            .discount_codes_path
            .as_ref()
            .map_or_else(|| "builtin".to_string(), |path| path.display().to_string()),
        "Discount catalog loaded"
    );

    let addr = config.listen_addr();
    info!(
        %addr,
        default_currency = %config.default_currency,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServiceError::Bind { addr, source })?;

    let state = Arc::new(AppState::new(&config, Arc::new(catalog)));

    info!(%addr, "Discount Code Service listening");
    serve(listener, state, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
