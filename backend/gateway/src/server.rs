//! Main HTTP Gateway Server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use linehook_channels::ChannelAdapter;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::health_api;

/// Application state shared across gateway routes.
#[derive(Clone)]
pub struct GatewayState {
    pub started_at: Instant,
    pub channels: Arc<Vec<String>>,
}

/// Assemble the router: health endpoint plus every adapter's webhook routes.
pub fn build_app(adapters: &[Arc<dyn ChannelAdapter>]) -> Router {
    let state = GatewayState {
        started_at: Instant::now(),
        channels: Arc::new(adapters.iter().map(|a| a.name().to_string()).collect()),
    };

    let mut app = Router::new()
        .route("/healthz", get(health_api::get_health))
        .with_state(state);
    for adapter in adapters {
        app = app.merge(adapter.build_router());
    }
    app.layer(TraceLayer::new_for_http())
}

/// Bind `addr`, start the adapters, and serve until `shutdown` resolves.
#[instrument(skip(adapters, shutdown))]
pub async fn start_server<F>(
    addr: &str,
    adapters: Vec<Arc<dyn ChannelAdapter>>,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_app(&adapters);
    for adapter in &adapters {
        adapter
            .start()
            .await
            .with_context(|| format!("Failed to start {} adapter", adapter.name()))?;
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("HTTP server shut down");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
