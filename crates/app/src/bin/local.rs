// Sandgate - Local Server

use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use sandgate_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.rust_log)),
        )
        .init();

    info!("Starting Sandgate server");
    info!(config = ?config, "Configuration loaded successfully");

    // No key, no service: the listener is never bound without it
    let key = sandgate_app::fetch_verification_key(&config)
        .await
        .map_err(|e| {
            error!(jwks_url = %config.jwks_url(), "Failed to fetch verification key: {}", e);
            anyhow::anyhow!("Verification key fetch failed: {}", e)
        })?;

    info!(kid = ?key.kid(), hs256 = key.supports_hmac(), "Verification key loaded");

    let app = sandgate_app::create_app(&config, key).map_err(|e| {
        error!("Failed to create application: {}", e);
        e
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
