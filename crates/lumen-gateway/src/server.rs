//! Server startup and lifecycle

use crate::{routes, AppState, GatewayConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Run the gateway server
pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config)?);
    let app = routes::create_router(Arc::clone(&state));

    let addr = state.config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("lumen gateway listening on http://{}", addr);
    warm_up(&state);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run server with graceful shutdown
pub async fn run_server_with_shutdown(
    config: GatewayConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config)?);
    let app = routes::create_router(Arc::clone(&state));

    let addr = state.config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("lumen gateway listening on http://{}", addr);
    warm_up(&state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("gateway shutdown complete");

    Ok(())
}

/// Kick off uploader initialization in the background so the first upload
/// doesn't pay the connection cost. A failure here is logged and retried
/// lazily on the next request that needs the uploader.
fn warm_up(state: &Arc<AppState>) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(e) = state.uploader().await {
            error!(error = %e, "uploader warm-up failed, will retry on first use");
        }
    });
}
