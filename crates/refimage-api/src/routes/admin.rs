//! # Cache Administration & Service Metadata Routes

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Build the administration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/status", get(status))
        .route("/cache/reload", post(reload_cache))
}

/// Response of `POST /cache/reload`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReloadResponse {
    pub status: String,
    /// Number of references in the rebuilt index.
    pub refs: usize,
}

/// Response of `GET /status`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub cache_size: usize,
    pub cache_loaded: bool,
}

/// POST /cache/reload — force a full index rebuild.
///
/// Serialized with any in-flight build; the mapping is replaced wholesale
/// only after the new scan completes.
#[utoipa::path(
    post,
    path = "/cache/reload",
    responses(
        (status = 200, description = "Index rebuilt", body = ReloadResponse),
        (status = 502, description = "Tree scan failed; previous index kept", body = ErrorBody),
    ),
    tag = "cache"
)]
pub(crate) async fn reload_cache(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let refs = state.cache.rebuild().await?;
    Ok(Json(ReloadResponse {
        status: "ok".to_string(),
        refs,
    }))
}

/// GET /status — service status and cache counters.
#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, description = "Service status", body = StatusResponse)),
    tag = "service"
)]
pub(crate) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let cache_size = state.cache.len();
    Json(StatusResponse {
        status: "online".to_string(),
        cache_size,
        cache_loaded: cache_size > 0,
    })
}

/// GET / — static service metadata plus the current cache size.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service metadata")),
    tag = "service"
)]
pub(crate) async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Reference image proxy",
        "endpoints": {
            "get_image": "/image/reference/{reference}",
            "reload_cache": "POST /cache/reload",
            "status": "/status",
        },
        "cache_size": state.cache.len(),
    }))
}
