//! Page fetching.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Downloads a page body. Non-success responses are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}
