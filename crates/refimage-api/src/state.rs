//! Shared application state.

use std::sync::Arc;

use refimage_cache::ReferenceCache;
use refimage_github::GithubClient;

/// Shared state passed to every route handler.
///
/// Cheap to clone: both members are behind `Arc`. The cache builds through
/// the same client the proxy fetches with, so one authenticated transport
/// serves the whole process.
#[derive(Clone)]
pub struct AppState {
    /// Authenticated client for the content repository.
    pub client: Arc<GithubClient>,
    /// The reference→path index.
    pub cache: Arc<ReferenceCache>,
}

impl AppState {
    /// Create the application state around a configured client.
    pub fn new(client: GithubClient) -> Self {
        let client = Arc::new(client);
        Self {
            cache: Arc::new(ReferenceCache::new(client.clone())),
            client,
        }
    }
}
