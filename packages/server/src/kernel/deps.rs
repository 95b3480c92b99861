//! Server dependencies
//!
//! Wires the pipeline collaborators from configuration. Everything the HTTP
//! layer touches goes through [`ServerDeps`], so tests can swap in mocks by
//! building the orchestrator themselves.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use lead_discovery::{
    CandidateSource, ContactPageEnricher, Discovery, EnrichmentWorkerPool, HttpDirectoryResolver,
    HttpDirectorySource, HttpPageFetcher, JobRegistry, Orchestrator, PipelineConfig,
    TavilySearchSource,
};

use crate::config::Config;

/// Timeout for search API calls; independent of page fetches.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every request handler
#[derive(Clone)]
pub struct ServerDeps {
    pub orchestrator: Orchestrator,
    pub registry: JobRegistry,
}

impl ServerDeps {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            registry: orchestrator.registry().clone(),
            orchestrator,
        }
    }

    /// Build the production pipeline: directory and Tavily sources when
    /// configured, HTTP fetching, regex contact extraction.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pipeline = PipelineConfig::new()
            .with_concurrency(config.enrich_concurrency)
            .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_secs))
            .with_resolve_timeout(Duration::from_secs(config.fetch_timeout_secs))
            .with_max_candidates(config.max_candidates);

        let fetcher =
            HttpPageFetcher::new(pipeline.fetch_timeout).context("Failed to create HTTP client")?;

        let mut sources: Vec<Arc<dyn CandidateSource>> = Vec::new();
        let mut directory_host = None;

        if let Some(template) = &config.directory_listing_url {
            let directory = HttpDirectorySource::new(fetcher.clone(), template.clone());
            directory_host = directory.host();
            sources.push(Arc::new(directory));
        }

        if let Some(api_key) = &config.tavily_api_key {
            let client = reqwest::Client::builder()
                .timeout(SEARCH_TIMEOUT)
                .build()
                .context("Failed to create search HTTP client")?;
            sources.push(Arc::new(
                TavilySearchSource::new(api_key.clone(), client).with_directory_host(directory_host),
            ));
        } else {
            tracing::warn!("TAVILY_API_KEY not set, web search discovery disabled");
        }

        if sources.is_empty() {
            tracing::warn!("No candidate sources configured; every job will fail discovery");
        }

        let discovery = Discovery::new(sources).with_max_candidates(pipeline.max_candidates);
        tracing::info!(sources = ?discovery.source_names(), "Discovery configured");

        let pool = EnrichmentWorkerPool::new(
            Arc::new(fetcher.clone()),
            Arc::new(ContactPageEnricher::new()),
            Arc::new(HttpDirectoryResolver::new(fetcher)),
            &pipeline,
        );

        Ok(Self::new(Orchestrator::new(
            JobRegistry::new(),
            discovery,
            pool,
        )))
    }
}
