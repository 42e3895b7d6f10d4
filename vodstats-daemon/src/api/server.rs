//! HTTP server implementation for the vodstats daemon.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use super::handlers::{get_video_stats, health, AppState};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/streamers/{channel_id}/videos", get(get_video_stats))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Bind `addr` and serve the API until Ctrl+C.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to get server address")?;

    info!("HTTP server listening on {}", local_addr);
    info!("Press Ctrl+C to stop");

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsService;
    use provider_fixture::FixtureVideoSource;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_server_serves_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(
            StatsService::new(Arc::new(FixtureVideoSource::sample())),
            100,
        );

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, state, async move {
            let _ = stop_rx.await;
        }));

        let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["source"], "fixture");

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
