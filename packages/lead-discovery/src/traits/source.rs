//! Candidate discovery provider trait.

use async_trait::async_trait;

use crate::error::DiscoveryResult;
use crate::types::{candidate::Candidate, criteria::SearchCriteria};

/// A source of candidate organizations (directory listing, web search, ...).
///
/// Implementations may fail; the [`Discovery`](crate::pipeline::Discovery)
/// composite logs the error and treats it as zero results.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Whether this source can serve the criteria at all.
    fn applies_to(&self, criteria: &SearchCriteria) -> bool {
        let _ = criteria;
        true
    }

    /// Discover candidates for the criteria. `prompt` is the user's
    /// original request, for providers that search by free text.
    async fn discover(&self, criteria: &SearchCriteria, prompt: &str)
        -> DiscoveryResult<Vec<Candidate>>;
}
