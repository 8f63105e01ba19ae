//! Liveness endpoint for hosting platforms that expect an HTTP port.

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;

pub const ALIVE_TEXT: &str = "🤖 Telegram Video Downloader Bot is LIVE!";

pub fn router() -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(alive))
}

async fn alive() -> (StatusCode, &'static str) {
    (StatusCode::OK, ALIVE_TEXT)
}

/// Serves until the listener fails.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}
