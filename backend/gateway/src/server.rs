//! Liveness HTTP Server.
//!
//! Every request, on any path and with any method, gets `200 OK`.

use anyhow::Result;
use axum::{http::header, response::IntoResponse, Router};
use tokio::net::TcpListener;
use tracing::{info, instrument};

pub const LIVENESS_BODY: &str = "Bot is running.\n";

async fn liveness() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], LIVENESS_BODY)
}

/// Router that answers every request with the liveness body.
pub fn liveness_router() -> Router {
    Router::new().fallback(liveness)
}

/// Bind `addr` and serve the liveness router until the process exits.
#[instrument]
pub async fn start_server(addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();
    info!("HTTP server running on port {}", port);

    axum::serve(listener, liveness_router()).await?;

    Ok(())
}
