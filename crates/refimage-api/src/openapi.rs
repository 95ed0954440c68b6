//! OpenAPI document, generated with utoipa derive macros and served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// The OpenAPI 3 document for the proxy's surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reference image proxy",
        description = "Resolves 7-digit product references to images in the content repository and proxies their bytes."
    ),
    paths(
        crate::routes::image::image_by_reference,
        crate::routes::admin::reload_cache,
        crate::routes::admin::status,
        crate::routes::admin::root,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::admin::ReloadResponse,
        crate::routes::admin::StatusResponse,
    )),
    tags(
        (name = "images", description = "Reference lookup and image proxying"),
        (name = "cache", description = "Index administration"),
        (name = "service", description = "Service metadata"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve))
}

async fn serve() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
