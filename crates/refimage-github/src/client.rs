//! # GitHub HTTP Client
//!
//! Wraps a `reqwest::Client` carrying the bearer token and GitHub accept
//! header as default headers, with a fixed per-request timeout. The tree
//! scan endpoints live on the REST API host; raw content lives on the
//! raw-content host, addressed by branch and percent-encoded path.

use serde::Deserialize;
use url::Url;

use crate::config::GithubConfig;
use crate::error::{ConfigError, FetchError, TreeScanError};

/// Content type assumed when the content store omits one.
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Which request to issue against the raw-content endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Download the file's bytes.
    Get,
    /// Fetch headers only; the returned body is empty.
    Head,
}

/// Result of a successful raw-content fetch.
#[derive(Debug, Clone)]
pub struct RawContent {
    /// File bytes. Empty for [`FetchKind::Head`].
    pub bytes: Vec<u8>,
    /// Content type reported upstream, or `image/jpeg` when absent.
    pub content_type: String,
    /// Upstream `Content-Length`, when reported.
    pub content_length: Option<u64>,
}

/// One entry of the recursive tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path of the entry inside the repository.
    pub path: String,
    /// Entry kind: `"blob"` for files, `"tree"` for directories.
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    /// Whether this entry is a file.
    pub fn is_blob(&self) -> bool {
        self.entry_type == "blob"
    }

    /// The entry's base name (final path component).
    pub fn base_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[derive(Deserialize)]
struct RefResponse {
    object: ObjectSha,
}

#[derive(Deserialize)]
struct ObjectSha {
    sha: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    tree: TreeSha,
}

#[derive(Deserialize)]
struct TreeSha {
    sha: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

/// Authenticated client for the content repository.
#[derive(Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    raw_root: Url,
    config: GithubConfig,
}

impl GithubClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] when the token contains characters
    /// that cannot form a header value or a base URL does not parse.
    pub fn new(config: GithubConfig) -> Result<Self, ConfigError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|_| ConfigError::Client("invalid token characters".to_string()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("refimage/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(format!("failed to build HTTP client: {e}")))?;

        let api_base = config.api_base.trim_end_matches('/').to_string();

        let mut raw_root = Url::parse(&config.raw_base)
            .map_err(|e| ConfigError::Client(format!("invalid raw base URL: {e}")))?;
        raw_root
            .path_segments_mut()
            .map_err(|()| ConfigError::Client("raw base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([&config.owner, &config.repo, &config.branch]);

        Ok(Self {
            http,
            api_base,
            raw_root,
            config,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    // ── Tree scan ────────────────────────────────────────────────────

    /// Resolve the configured branch to its current commit identifier.
    pub async fn branch_head(&self) -> Result<String, TreeScanError> {
        let url = format!(
            "{}/repos/{}/{}/git/ref/heads/{}",
            self.api_base, self.config.owner, self.config.repo, self.config.branch
        );
        let resp: RefResponse = self.get_json(url).await?;
        Ok(resp.object.sha)
    }

    /// Resolve a commit to its root tree identifier.
    pub async fn commit_tree(&self, commit_sha: &str) -> Result<String, TreeScanError> {
        let url = format!(
            "{}/repos/{}/{}/git/commits/{}",
            self.api_base, self.config.owner, self.config.repo, commit_sha
        );
        let resp: CommitResponse = self.get_json(url).await?;
        Ok(resp.tree.sha)
    }

    /// Fetch the full recursive listing of a tree in a single call.
    ///
    /// A directory-by-directory walk would not scale to repositories with
    /// many thousands of files under one nested prefix; the recursive
    /// listing has no per-directory entry limit.
    pub async fn recursive_tree(&self, tree_sha: &str) -> Result<Vec<TreeEntry>, TreeScanError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, self.config.owner, self.config.repo, tree_sha
        );
        let resp: TreeResponse = self.get_json(url).await?;
        Ok(resp.tree)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, TreeScanError> {
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TreeScanError::Http {
                endpoint: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TreeScanError::Status {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| TreeScanError::Deserialization {
                endpoint: url,
                source: e,
            })
    }

    // ── Raw content ──────────────────────────────────────────────────

    /// Fetch one file from the raw-content endpoint.
    ///
    /// The path is percent-encoded per segment (slashes preserved). Every
    /// transport and status outcome maps to one [`FetchError`] variant;
    /// only HTTP 200 is a success.
    pub async fn fetch_raw(&self, path: &str, kind: FetchKind) -> Result<RawContent, FetchError> {
        let url = self.raw_url(path)?;

        let request = match kind {
            FetchKind::Get => self.http.get(url),
            FetchKind::Head => self.http.head(url),
        };

        let resp = request
            .send()
            .await
            .map_err(|e| classify_transport(path, e))?;

        match resp.status().as_u16() {
            200 => {}
            403 => {
                return Err(FetchError::Forbidden {
                    path: path.to_string(),
                })
            }
            404 => {
                return Err(FetchError::NotFound {
                    path: path.to_string(),
                })
            }
            429 => {
                return Err(FetchError::RateLimited {
                    path: path.to_string(),
                })
            }
            status => {
                return Err(FetchError::Upstream {
                    path: path.to_string(),
                    status,
                })
            }
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content_length = resp
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let bytes = match kind {
            FetchKind::Head => Vec::new(),
            FetchKind::Get => resp
                .bytes()
                .await
                .map_err(|e| classify_transport(path, e))?
                .to_vec(),
        };

        Ok(RawContent {
            bytes,
            content_type,
            content_length,
        })
    }

    fn raw_url(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = self.raw_root.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Connection {
                path: path.to_string(),
                detail: "raw base URL cannot carry path segments".to_string(),
            })?
            .extend(path.split('/'));
        Ok(url)
    }
}

fn classify_transport(path: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            path: path.to_string(),
        }
    } else {
        FetchError::Connection {
            path: path.to_string(),
            detail: err.to_string(),
        }
    }
}
