//! Bounded fan-out enrichment of one batch of candidates.
//!
//! ```text
//! batch ──► stream::iter ──► buffered(concurrency)
//!              │
//!              ├─► resolve website (directory lookup if needed)
//!              ├─► fetch page (bounded time)
//!              ├─► PageEnricher
//!              └─► score_lead
//! ```
//!
//! A candidate that errors or yields no contact data is dropped. The batch
//! completes only after every unit has settled.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use super::scoring::score_lead;
use crate::config::PipelineConfig;
use crate::error::{FetchError, FetchResult};
use crate::traits::{
    enricher::PageEnricher, fetcher::PageFetcher, resolver::DirectoryResolver,
};
use crate::types::{candidate::Candidate, criteria::SearchCriteria, lead::Lead};

/// Result of enriching one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub leads: Vec<Lead>,
    pub attempted: usize,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.leads.len()
    }
}

/// Applies fetch + enrichment + scoring to candidates with bounded concurrency.
pub struct EnrichmentWorkerPool {
    fetcher: Arc<dyn PageFetcher>,
    enricher: Arc<dyn PageEnricher>,
    resolver: Arc<dyn DirectoryResolver>,
    concurrency: usize,
    fetch_timeout: Duration,
    resolve_timeout: Duration,
}

impl EnrichmentWorkerPool {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        enricher: Arc<dyn PageEnricher>,
        resolver: Arc<dyn DirectoryResolver>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            resolver,
            concurrency: config.concurrency.max(1),
            fetch_timeout: config.fetch_timeout,
            resolve_timeout: config.resolve_timeout,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich every candidate in the batch. Leads come back in batch order.
    pub async fn enrich_batch(&self, batch: &[Candidate], criteria: &SearchCriteria) -> BatchOutcome {
        debug!(
            batch_size = batch.len(),
            "Enriching batch (max {} concurrent)",
            self.concurrency,
        );

        // Futures are built up front so the stream holds no borrowing closures.
        let units: Vec<_> = batch
            .iter()
            .map(|candidate| self.enrich_or_drop(candidate, criteria))
            .collect();
        let leads: Vec<Lead> = stream::iter(units)
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        info!(
            attempted = batch.len(),
            succeeded = leads.len(),
            "Batch enrichment complete"
        );

        BatchOutcome {
            leads,
            attempted: batch.len(),
        }
    }

    async fn enrich_or_drop(&self, candidate: &Candidate, criteria: &SearchCriteria) -> Option<Lead> {
        match self.enrich_candidate(candidate, criteria).await {
            Ok(lead) => lead,
            Err(e) => {
                debug!(candidate = %candidate.name, error = %e, "Candidate dropped");
                None
            }
        }
    }

    /// Enrich one candidate. `Ok(None)` means the page had nothing usable.
    async fn enrich_candidate(
        &self,
        candidate: &Candidate,
        criteria: &SearchCriteria,
    ) -> FetchResult<Option<Lead>> {
        let Some(url) = self.resolve_target(candidate).await? else {
            debug!(candidate = %candidate.name, "No website resolved");
            return Ok(None);
        };

        let html = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&url))
            .await
            .map_err(|_| FetchError::Timeout { url: url.clone() })??;

        let contacts = self.enricher.enrich(&url, &html).await?;
        Ok(score_lead(candidate, &url, contacts, criteria))
    }

    async fn resolve_target(&self, candidate: &Candidate) -> FetchResult<Option<String>> {
        if let Some(website) = candidate.website.as_ref().filter(|w| !w.trim().is_empty()) {
            return Ok(Some(website.clone()));
        }

        let Some(directory_ref) = candidate.directory_ref.as_deref() else {
            return Ok(None);
        };

        tokio::time::timeout(
            self.resolve_timeout,
            self.resolver.resolve_canonical_link(directory_ref),
        )
        .await
        .map_err(|_| FetchError::Timeout {
            url: directory_ref.to_string(),
        })?
    }
}
