//! Candidate discovery across ordered strategies.
//!
//! ```text
//! criteria
//!     │
//!     ├─► directory source (school searches with a location)
//!     │       └─► non-empty? done
//!     └─► search source (fallback, primary for businesses)
//!             └─► empty? NoOrganizationsFound
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::traits::source::CandidateSource;
use crate::types::{candidate::Candidate, criteria::SearchCriteria};

/// Runs candidate sources in order; the first non-empty one wins.
#[derive(Clone)]
pub struct Discovery {
    sources: Vec<Arc<dyn CandidateSource>>,
    max_candidates: usize,
}

impl Discovery {
    pub fn new(sources: Vec<Arc<dyn CandidateSource>>) -> Self {
        Self {
            sources,
            max_candidates: usize::MAX,
        }
    }

    /// Cap the number of candidates returned.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Discover candidates.
    ///
    /// Provider failures are logged and count as zero results. Only total
    /// exhaustion is an error.
    pub async fn discover(
        &self,
        criteria: &SearchCriteria,
        prompt: &str,
    ) -> DiscoveryResult<Vec<Candidate>> {
        for source in &self.sources {
            if !source.applies_to(criteria) {
                continue;
            }

            let found = match source.discover(criteria, prompt).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(provider = source.name(), error = %e, "Discovery provider failed, skipping");
                    continue;
                }
            };

            let candidates = self.dedupe(found);
            info!(
                provider = source.name(),
                count = candidates.len(),
                "Discovery provider returned candidates"
            );

            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }

        Err(DiscoveryError::NoOrganizationsFound {
            query: prompt.trim().to_string(),
        })
    }

    /// Drop duplicates while keeping discovery order, then apply the cap.
    fn dedupe(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.dedupe_key()))
            .take(self.max_candidates)
            .collect()
    }
}
