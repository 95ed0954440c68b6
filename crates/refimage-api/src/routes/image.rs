//! # Image Lookup/Proxy Route
//!
//! The request path of the read-through proxy:
//!
//! 1. Normalize the caller's reference — malformed input is rejected with
//!    400 before the cache or the content store is touched.
//! 2. If the index is empty, build it synchronously (single-flight with
//!    any concurrent build).
//! 3. Resolve the reference to a repository path; absent → 404 naming
//!    both the original and normalized forms.
//! 4. Fetch the file from the raw-content endpoint with the request's own
//!    method and translate the outcome taxonomy to HTTP.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use refimage_core::Reference;
use refimage_github::FetchKind;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Build the image proxy router.
pub fn router() -> Router<AppState> {
    // axum routes HEAD requests to the GET handler; the handler inspects
    // the method to avoid downloading a body it will not send.
    Router::new().route("/image/reference/:reference", get(image_by_reference))
}

/// GET|HEAD /image/reference/{reference} — serve the image for a product
/// reference.
///
/// Accepts the reference as `NNNNNNN`, `NNN.NNNN`, or `NNN-NNNN`. GET
/// returns the image bytes with the upstream content type; HEAD returns
/// headers only.
#[utoipa::path(
    get,
    path = "/image/reference/{reference}",
    params(
        ("reference" = String, Path, description = "Product reference: NNNNNNN, NNN.NNNN, or NNN-NNNN")
    ),
    responses(
        (status = 200, description = "Image bytes (GET) or headers only (HEAD)"),
        (status = 400, description = "Malformed reference", body = ErrorBody),
        (status = 404, description = "Reference not indexed, or file gone upstream", body = ErrorBody),
        (status = 403, description = "Content store denied access", body = ErrorBody),
        (status = 429, description = "Content store rate limit", body = ErrorBody),
        (status = 502, description = "Content store error", body = ErrorBody),
        (status = 504, description = "Content store timeout", body = ErrorBody),
    ),
    tag = "images"
)]
pub(crate) async fn image_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    method: Method,
) -> Result<Response, AppError> {
    let normalized = Reference::normalize(&reference)?;
    if normalized.as_str() != reference.trim() {
        tracing::debug!(original = %reference, normalized = %normalized, "reference normalized");
    }

    // Guard against a failed startup build: the first lookup retries it.
    if state.cache.is_empty() {
        state.cache.ensure_loaded().await?;
    }

    let path = state
        .cache
        .lookup(&normalized)
        .ok_or_else(|| AppError::UnknownReference {
            original: reference.clone(),
            normalized: normalized.clone(),
        })?;

    let kind = if method == Method::HEAD {
        FetchKind::Head
    } else {
        FetchKind::Get
    };
    let content = state.client.fetch_raw(&path, kind).await?;

    tracing::debug!(
        reference = %normalized,
        path = %path,
        bytes = content.bytes.len(),
        content_type = %content.content_type,
        "image fetched from content store"
    );

    let response = match kind {
        FetchKind::Get => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content.content_type)
            .body(Body::from(content.bytes)),
        FetchKind::Head => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content.content_type)
            .header(header::CONTENT_LENGTH, content.content_length.unwrap_or(0))
            .body(Body::empty()),
    };
    response.map_err(|e| AppError::Internal(format!("failed to build response: {e}")))
}
