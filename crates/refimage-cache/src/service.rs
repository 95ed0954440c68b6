//! The cache service: snapshot reads, serialized rebuilds.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use refimage_core::Reference;
use refimage_github::{GithubClient, TreeScanError};

use crate::build::{build_index, BuildStats};

/// Process-wide reference→path index.
///
/// The mapping pointer is guarded by a read-mostly lock; readers clone the
/// current `Arc` out, so a rebuild never invalidates an in-flight lookup.
/// The build lock serializes rebuilds — at most one scan is in flight,
/// and callers that only need *a* populated cache coalesce onto it.
pub struct ReferenceCache {
    client: Arc<GithubClient>,
    snapshot: RwLock<Arc<HashMap<Reference, String>>>,
    stats: RwLock<Option<BuildStats>>,
    build_lock: tokio::sync::Mutex<()>,
}

impl ReferenceCache {
    /// Create an empty cache that builds through the given client.
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self {
            client,
            snapshot: RwLock::new(Arc::new(HashMap::new())),
            stats: RwLock::new(None),
            build_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Look up the path cached for a reference. Read-only — never triggers
    /// a rebuild.
    pub fn lookup(&self, reference: &Reference) -> Option<String> {
        self.snapshot.read().get(reference).cloned()
    }

    /// Number of cached references.
    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    /// Counters from the most recent successful build, if any.
    pub fn stats(&self) -> Option<BuildStats> {
        *self.stats.read()
    }

    /// Run a full build and replace the mapping. Returns the new size.
    ///
    /// Serialized: a rebuild that arrives while another is in flight waits
    /// for it to finish, then performs its own scan (an explicit reload
    /// must observe the repository state at or after the time it was
    /// requested).
    ///
    /// # Errors
    ///
    /// A failed scan aborts this build attempt only; the previous mapping
    /// stays in place and keeps serving lookups.
    pub async fn rebuild(&self) -> Result<usize, TreeScanError> {
        let _guard = self.build_lock.lock().await;
        self.build_and_swap().await
    }

    /// Build the cache if — and only if — it is currently empty.
    ///
    /// Concurrent callers collapse onto a single in-flight build: whoever
    /// acquires the build lock first scans, and the rest find the cache
    /// populated after the lock is released.
    pub async fn ensure_loaded(&self) -> Result<(), TreeScanError> {
        if !self.is_empty() {
            return Ok(());
        }
        let _guard = self.build_lock.lock().await;
        // Re-check under the lock: a concurrent build may have filled the
        // cache while this caller was waiting.
        if !self.is_empty() {
            return Ok(());
        }
        self.build_and_swap().await.map(|_| ())
    }

    async fn build_and_swap(&self) -> Result<usize, TreeScanError> {
        let (map, stats) = build_index(&self.client).await?;
        let size = map.len();

        // Swap in the complete new mapping atomically; readers holding the
        // old Arc keep a consistent view until they drop it.
        *self.snapshot.write() = Arc::new(map);
        *self.stats.write() = Some(stats);

        tracing::info!(
            total_blobs = stats.total_blobs,
            with_reference = stats.with_reference,
            "reference cache rebuilt"
        );
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refimage_github::GithubConfig;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_scan(server: &MockServer, tree: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path_regex(r"/git/ref/heads/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": { "sha": "commit-sha" }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/git/commits/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tree": { "sha": "tree-sha" }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/git/trees/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "tree": tree })),
            )
            .mount(server)
            .await;
    }

    fn cache_for(server: &MockServer) -> ReferenceCache {
        let mut config = GithubConfig::new("test-token");
        config.api_base = server.uri();
        config.raw_base = server.uri();
        config.timeout_secs = 1;
        ReferenceCache::new(Arc::new(GithubClient::new(config).unwrap()))
    }

    fn reference(s: &str) -> Reference {
        Reference::new(s).unwrap()
    }

    #[tokio::test]
    async fn build_filters_dedups_and_counts() {
        let server = MockServer::start().await;
        mount_scan(
            &server,
            serde_json::json!([
                // First-wins: A keeps the key, B is dropped.
                { "path": "images/100-0001 A.jpg", "type": "blob" },
                { "path": "images/100-0001 B.jpg", "type": "blob" },
                // No extractable reference: counted, not cached.
                { "path": "images/logo.png", "type": "blob" },
                // Outside the prefix: excluded from count and cache.
                { "path": "docs/200-0002 C.jpg", "type": "blob" },
                // Directories never count.
                { "path": "images/subdir", "type": "tree" },
                // Nested under the prefix still qualifies.
                { "path": "images/summer/300-0003.jpeg", "type": "blob" }
            ]),
        )
        .await;

        let cache = cache_for(&server);
        let size = cache.rebuild().await.unwrap();
        assert_eq!(size, 2);

        assert_eq!(
            cache.lookup(&reference("1000001")).as_deref(),
            Some("images/100-0001 A.jpg")
        );
        assert_eq!(
            cache.lookup(&reference("3000003")).as_deref(),
            Some("images/summer/300-0003.jpeg")
        );
        assert_eq!(cache.lookup(&reference("2000002")), None);

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_blobs, 4); // logo.png and the dup both count
        assert_eq!(stats.with_reference, 2);
    }

    #[tokio::test]
    async fn failed_rebuild_preserves_previous_snapshot() {
        let server = MockServer::start().await;
        mount_scan(
            &server,
            serde_json::json!([{ "path": "images/100-0001 A.jpg", "type": "blob" }]),
        )
        .await;

        let cache = cache_for(&server);
        cache.rebuild().await.unwrap();
        assert_eq!(cache.len(), 1);

        // The store starts failing: rebuild aborts, old mapping survives.
        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(cache.rebuild().await.is_err());
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.lookup(&reference("1000001")).as_deref(),
            Some("images/100-0001 A.jpg")
        );
    }

    #[tokio::test]
    async fn rebuild_replaces_rather_than_merges() {
        let server = MockServer::start().await;
        mount_scan(
            &server,
            serde_json::json!([{ "path": "images/100-0001 A.jpg", "type": "blob" }]),
        )
        .await;

        let cache = cache_for(&server);
        cache.rebuild().await.unwrap();

        server.reset().await;
        mount_scan(
            &server,
            serde_json::json!([{ "path": "images/200-0002 B.jpg", "type": "blob" }]),
        )
        .await;

        let size = cache.rebuild().await.unwrap();
        assert_eq!(size, 1);
        assert_eq!(cache.lookup(&reference("1000001")), None);
        assert_eq!(
            cache.lookup(&reference("2000002")).as_deref(),
            Some("images/200-0002 B.jpg")
        );
    }

    #[tokio::test]
    async fn concurrent_ensure_loaded_scans_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/git/ref/heads/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": { "sha": "commit-sha" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/git/commits/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tree": { "sha": "tree-sha" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/git/trees/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tree": [{ "path": "images/100-0001 A.jpg", "type": "blob" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cache = Arc::new(cache_for(&server));
        let (a, b, c) = tokio::join!(
            cache.ensure_loaded(),
            cache.ensure_loaded(),
            cache.ensure_loaded()
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();
        assert_eq!(cache.len(), 1);
        // Mock expectations verify the single scan when the server drops.
    }

    #[tokio::test]
    async fn ensure_loaded_is_noop_when_populated() {
        let server = MockServer::start().await;
        mount_scan(
            &server,
            serde_json::json!([{ "path": "images/100-0001 A.jpg", "type": "blob" }]),
        )
        .await;

        let cache = cache_for(&server);
        cache.rebuild().await.unwrap();

        // Even with the store now failing, ensure_loaded succeeds — it
        // never rescans a populated cache.
        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        cache.ensure_loaded().await.unwrap();
        assert_eq!(cache.len(), 1);
    }
}
