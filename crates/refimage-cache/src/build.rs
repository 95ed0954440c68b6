//! Index construction from one full tree scan.

use std::collections::HashMap;

use refimage_core::Reference;
use refimage_github::{GithubClient, TreeScanError};

/// Counters recorded by every successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Blob entries under the image prefix, with or without a reference.
    pub total_blobs: usize,
    /// Entries that produced a cache key (first occurrences only).
    pub with_reference: usize,
}

/// Produce a full reference→path mapping by scanning the content
/// repository.
///
/// Three sequential remote calls — branch→commit, commit→tree, recursive
/// tree listing — then a pure pass over the entries: keep blobs under the
/// image prefix, extract a reference from each base name, and insert under
/// first-wins semantics (the entry encountered first in traversal order
/// keeps the key; later duplicates are dropped). Entries outside the
/// prefix count nowhere.
///
/// # Errors
///
/// Any of the three calls failing aborts the whole build; the caller must
/// keep serving from its previous mapping.
pub async fn build_index(
    client: &GithubClient,
) -> Result<(HashMap<Reference, String>, BuildStats), TreeScanError> {
    let commit_sha = client.branch_head().await?;
    let tree_sha = client.commit_tree(&commit_sha).await?;
    let entries = client.recursive_tree(&tree_sha).await?;

    let prefix = client.config().images_prefix.as_str();
    let mut map: HashMap<Reference, String> = HashMap::new();
    let mut total_blobs = 0usize;
    let mut with_reference = 0usize;

    for entry in entries {
        if !entry.is_blob() || !entry.path.starts_with(prefix) {
            continue;
        }
        total_blobs += 1;

        let Some(reference) = Reference::extract(entry.base_name()) else {
            continue;
        };
        // First-wins: traversal order is whatever the remote listing
        // returned, so ties are best-effort.
        if !map.contains_key(&reference) {
            map.insert(reference, entry.path);
            with_reference += 1;
        }
    }

    Ok((
        map,
        BuildStats {
            total_blobs,
            with_reference,
        },
    ))
}
