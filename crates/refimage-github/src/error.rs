//! Error types for the content repository client.
//!
//! Two separate taxonomies, matching the two call sites:
//!
//! - [`TreeScanError`] — any failure during the three-call tree scan.
//!   The cache build aborts wholesale on the first one.
//! - [`FetchError`] — the outcome taxonomy of a single raw-content fetch,
//!   carrying the attempted path so the HTTP boundary can name it.

use thiserror::Error;

/// Configuration failure. Fatal at startup — the process must not serve
/// requests without a usable token.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `GITHUB_TOKEN` is absent or empty.
    #[error("GITHUB_TOKEN must be set — the content repository requires an authenticated token")]
    MissingToken,

    /// The HTTP client could not be constructed from the configuration.
    #[error("invalid HTTP client configuration: {0}")]
    Client(String),
}

/// Errors from the tree scan calls (branch ref, commit, recursive tree).
#[derive(Debug, Error)]
pub enum TreeScanError {
    /// The outbound call itself failed (connection error or timeout).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The content store answered with a non-success status.
    #[error("content store {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Outcome taxonomy of a raw-content fetch.
///
/// Every variant names the repository path that was attempted, so error
/// responses can point at the exact file for diagnosis.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The outbound call exceeded the configured timeout.
    #[error("timed out fetching {path:?} from the content store")]
    Timeout { path: String },

    /// The outbound call failed before a status was received.
    #[error("connection error fetching {path:?}: {detail}")]
    Connection { path: String, detail: String },

    /// The content store denied access (HTTP 403) — usually an invalid or
    /// under-privileged token.
    #[error("content store denied access to {path:?} — check that the token is valid and authorized")]
    Forbidden { path: String },

    /// The file is not present in the content store (HTTP 404).
    #[error("{path:?} not found in the content store")]
    NotFound { path: String },

    /// The content store is rate limiting us (HTTP 429).
    #[error("content store rate limit hit fetching {path:?} — retry later")]
    RateLimited { path: String },

    /// Any other non-success status.
    #[error("content store returned {status} for {path:?}")]
    Upstream { path: String, status: u16 },
}

impl FetchError {
    /// The repository path this fetch attempted.
    pub fn path(&self) -> &str {
        match self {
            Self::Timeout { path }
            | Self::Connection { path, .. }
            | Self::Forbidden { path }
            | Self::NotFound { path }
            | Self::RateLimited { path }
            | Self::Upstream { path, .. } => path,
        }
    }
}
