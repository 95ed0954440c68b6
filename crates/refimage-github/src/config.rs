//! Client configuration.
//!
//! The repository coordinates are fixed constants; only the access token
//! comes from the environment, and the process must refuse to serve
//! without it.

use crate::error::ConfigError;

/// Owner of the content repository.
pub const OWNER: &str = "larroude-tech";

/// Name of the content repository.
pub const REPO: &str = "Fluxo-barcode";

/// Branch whose tree is scanned and whose raw content is served.
pub const BRANCH: &str = "main";

/// Directory prefix under which product images live.
pub const IMAGES_PREFIX: &str = "images/";

/// Default timeout for every outbound call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Configuration for [`GithubClient`](crate::GithubClient).
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API.
    pub api_base: String,
    /// Base URL of the raw-content host.
    pub raw_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch to scan and serve from.
    pub branch: String,
    /// Path prefix of the image directory inside the repository.
    pub images_prefix: String,
    /// Access token for the authenticated transport.
    pub token: String,
    /// Request timeout in seconds (default: 15).
    pub timeout_secs: u64,
}

impl GithubConfig {
    /// Create a configuration for the fixed repository coordinates with
    /// the given access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            owner: OWNER.to_string(),
            repo: REPO.to_string(),
            branch: BRANCH.to_string(),
            images_prefix: IMAGES_PREFIX.to_string(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when `GITHUB_TOKEN` is absent
    /// or empty. The caller must treat this as fatal before serving any
    /// request.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim().to_string())),
            _ => Err(ConfigError::MissingToken),
        }
    }

    /// Redacted token preview for startup logging: the first 10 characters
    /// followed by an ellipsis, never the full value.
    pub fn token_preview(&self) -> String {
        if self.token.len() > 10 {
            format!("{}...", &self.token[..10])
        } else {
            "***".to_string()
        }
    }
}
