//! Server startup and lifecycle

use crate::{routes, AppState, GatewayConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the gateway server
pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone()).await?);

    let writable = state.allow_writes();
    let app = routes::create_router(Arc::clone(&state));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        "WebDAV ready at http://{}{}/ ({})",
        addr,
        config.mount,
        if writable { "writable" } else { "read-only" }
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the gateway with graceful shutdown
pub async fn run_server_with_shutdown(
    config: GatewayConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone()).await?);

    let writable = state.allow_writes();
    let app = routes::create_router(Arc::clone(&state));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        "WebDAV ready at http://{}{}/ ({})",
        addr,
        config.mount,
        if writable { "writable" } else { "read-only" }
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("gateway shutdown complete");

    Ok(())
}
