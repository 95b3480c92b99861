//! Page enrichment (contact extraction) trait.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::lead::PageContacts;

/// Extracts emails, phone numbers and a best-guess contact role from a page.
///
/// The extraction heuristics live behind this trait; the pipeline only
/// cares whether anything usable came back.
#[async_trait]
pub trait PageEnricher: Send + Sync {
    async fn enrich(&self, url: &str, html: &str) -> FetchResult<PageContacts>;
}
