//! # refimage-github — GitHub Content Repository Client
//!
//! Typed HTTP client for the remote content store holding the product
//! images. Two concerns, matching the two halves of the proxy:
//!
//! - **Tree scanning** — resolve the configured branch to its current
//!   commit, the commit to its root tree, and fetch the full recursive
//!   listing in a single call. Used once per cache build.
//! - **Raw content retrieval** — fetch one file's bytes (or just its
//!   headers) from the raw-content endpoint, translating every transport
//!   and status outcome into a typed result.
//!
//! All calls are authenticated with the bearer token from `GITHUB_TOKEN`.
//! No retries are performed here — a failed call is reported to the one
//! caller that triggered it.

mod client;
mod config;
mod error;

pub use client::{FetchKind, GithubClient, RawContent, TreeEntry};
pub use config::{GithubConfig, BRANCH, IMAGES_PREFIX, OWNER, REPO};
pub use error::{ConfigError, FetchError, TreeScanError};
