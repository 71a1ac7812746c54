use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info};

use tax_api::{AppState, Config, build_registry, build_router, logging};
use tax_core::TaxService;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let config = Config::parse();
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    let db_config = config.db_config();
    debug!("connecting to {} backend", db_config.backend);
    let registry = build_registry();
    let repo = registry
        .create(&db_config)
        .await
        .context("Failed to open tax store")?;

    let state = AppState::new(
        TaxService::new(Arc::from(repo)),
        config.admin_credentials(),
        config.app_info(),
    );
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, name = %config.app_name, version = %config.app_version, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

// ─── shutdown ────────────────────────────────────────────────────────────────

/// Resolves on SIGINT or SIGTERM. A handler that cannot be installed never
/// fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            error!(?error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                error!(?error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
