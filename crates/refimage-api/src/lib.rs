//! # refimage-api — HTTP Surface of the Reference Image Proxy
//!
//! The service resolves 7-digit product references to file paths inside a
//! GitHub content repository and proxies the corresponding image bytes.
//!
//! ## API Surface
//!
//! | Method/Path                       | Module             | Behavior                      |
//! |-----------------------------------|--------------------|-------------------------------|
//! | `GET\|HEAD /image/reference/{r}`  | [`routes::image`]  | Lookup + proxied fetch        |
//! | `POST /cache/reload`              | [`routes::admin`]  | Force full index rebuild      |
//! | `GET /status`                     | [`routes::admin`]  | Cache size and loaded flag    |
//! | `GET /`                           | [`routes::admin`]  | Service metadata              |
//! | `GET /openapi.json`               | [`openapi`]        | Generated OpenAPI document    |
//!
//! Failures are translated at this boundary only: validation → 400, index
//! miss → 404, and the upstream fetch taxonomy → 403/404/429/502/504.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::image::router())
        .merge(routes::admin::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
