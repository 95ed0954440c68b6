//! Server entrypoint.
//!
//! Fails fast when `GITHUB_TOKEN` is absent — the proxy must not serve
//! requests it cannot authenticate upstream. The initial index build is
//! attempted once at startup; if the content store is unavailable the
//! service still comes up and the first lookup retries the build.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use refimage_api::state::AppState;
use refimage_github::{GithubClient, GithubConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match GithubConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!(token = %config.token_preview(), "GitHub token loaded from environment");

    let client = match GithubClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    let state = AppState::new(client);

    if let Err(e) = state.cache.ensure_loaded().await {
        tracing::warn!("initial cache build failed, will retry on first lookup: {e}");
    }

    let port: u16 = std::env::var("REFIMAGE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("refimage-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, refimage_api::app(state).into_make_service())
        .await
        .expect("server error");
}
