//! Directory reference resolution.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Follows a directory entry to the organization's own website.
#[async_trait]
pub trait DirectoryResolver: Send + Sync {
    /// Returns the canonical external link, or `None` when the entry has none.
    async fn resolve_canonical_link(&self, directory_ref: &str) -> FetchResult<Option<String>>;
}
