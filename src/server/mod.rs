//! HTTP server for the menu resource service

pub mod router;

pub use router::build_menu_routes;

use crate::config::UpmsConfig;
use crate::menu::{AppState, MenuResourceService};
use anyhow::Result;
use tokio::net::TcpListener;

/// Serve the menu routes with graceful shutdown
///
/// Binds to `config.server`, and stops on SIGTERM or Ctrl+C.
pub async fn serve(config: &UpmsConfig, service: MenuResourceService) -> Result<()> {
    let service = service
        .with_labels(config.operations.labels.clone())
        .with_max_limit(config.pagination.max_limit);
    let state = AppState::new(service).with_default_limit(config.pagination.default_limit);
    let app = build_menu_routes(state);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
