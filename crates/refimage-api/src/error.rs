//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps the domain error taxonomies (reference validation, tree scan,
//! raw-content fetch) to HTTP status codes with structured JSON bodies.
//!
//! Unlike a public-facing API, this proxy serves operators diagnosing
//! missing product images — so upstream failure messages deliberately
//! include the resolved repository path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use refimage_core::{Reference, ValidationError};
use refimage_github::{FetchError, TreeScanError};

/// Structured JSON error response body.
///
/// All non-binary error responses use this format.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "INVALID_REFERENCE").
    pub code: String,
    /// Human-readable error message, naming the attempted path where one
    /// was resolved.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The caller-supplied reference is malformed (400). Raised before any
    /// cache lookup or upstream call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The normalized reference has no mapping in the index (404).
    #[error("reference {original:?} (normalized: {normalized}) not found in the image index")]
    UnknownReference {
        original: String,
        normalized: Reference,
    },

    /// The raw-content fetch failed; status follows the fetch taxonomy.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An index rebuild (explicit reload or rebuild-on-empty) failed (502).
    #[error("image index rebuild failed: {0}")]
    Scan(#[from] TreeScanError),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for
    /// this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REFERENCE"),
            Self::UnknownReference { .. } => (StatusCode::NOT_FOUND, "UNKNOWN_REFERENCE"),
            Self::Fetch(fetch) => match fetch {
                FetchError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
                FetchError::Connection { .. } => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_UNREACHABLE")
                }
                FetchError::Forbidden { .. } => (StatusCode::FORBIDDEN, "UPSTREAM_FORBIDDEN"),
                FetchError::NotFound { .. } => (StatusCode::NOT_FOUND, "UPSTREAM_NOT_FOUND"),
                FetchError::RateLimited { .. } => {
                    (StatusCode::TOO_MANY_REQUESTS, "UPSTREAM_RATE_LIMITED")
                }
                FetchError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
            Self::Scan(_) => (StatusCode::BAD_GATEWAY, "INDEX_REBUILD_FAILED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Log server-side errors for operator visibility.
        match &self {
            Self::Fetch(_) | Self::Scan(_) => {
                tracing::error!(error = %self, "upstream content store error")
            }
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
