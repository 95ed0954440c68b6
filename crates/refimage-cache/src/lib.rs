//! # refimage-cache — The Reference Index
//!
//! Builds and holds the reference→path mapping the proxy answers lookups
//! from. The mapping is produced by one full scan of the content
//! repository's recursive tree and replaced wholesale on every rebuild;
//! there is no entry-level mutation, expiry, or persistence.
//!
//! ## Concurrency
//!
//! Readers take an `Arc` snapshot of the current mapping and never observe
//! a half-built one. Rebuilds are serialized behind an async mutex: an
//! explicit reload racing with a rebuild-on-empty collapses into a single
//! scan that all callers wait on. A failed build leaves the previous
//! snapshot untouched.

mod build;
mod service;

pub use build::{build_index, BuildStats};
pub use service::ReferenceCache;
