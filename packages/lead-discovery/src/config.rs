//! Pipeline configuration.

use std::time::Duration;

/// Configuration for discovery and enrichment runs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum candidates enriched at once. Also the batch size: each
    /// review checkpoint covers exactly one concurrency window.
    ///
    /// Default: 15.
    pub concurrency: usize,

    /// Time budget for fetching one candidate page.
    ///
    /// Default: 10 seconds.
    pub fetch_timeout: Duration,

    /// Time budget for resolving a directory reference to a website.
    ///
    /// Default: 10 seconds.
    pub resolve_timeout: Duration,

    /// Discovered candidates beyond this count are dropped.
    ///
    /// Default: 100.
    pub max_candidates: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 15,
            fetch_timeout: Duration::from_secs(10),
            resolve_timeout: Duration::from_secs(10),
            max_candidates: 100,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the page fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the directory resolution timeout.
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Set the candidate cap.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }
}
