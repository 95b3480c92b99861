//! Tavily web search provider.
//!
//! Used for commercial searches, prompts without a location, and as the
//! fallback when the directory yields nothing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{host_matches, is_excluded_host, normalized_host};
use crate::error::{DiscoveryError, DiscoveryResult, FetchError};
use crate::traits::source::CandidateSource;
use crate::types::{candidate::Candidate, criteria::SearchCriteria};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const DEFAULT_MAX_RESULTS: usize = 20;

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
}

/// Candidate source backed by Tavily search.
pub struct TavilySearchSource {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    directory_host: Option<String>,
    max_results: usize,
}

impl TavilySearchSource {
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.into(),
            client,
            endpoint: TAVILY_SEARCH_URL.to_string(),
            directory_host: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Drop results pointing at the school directory itself.
    pub fn with_directory_host(mut self, host: Option<String>) -> Self {
        self.directory_host = host;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Point at a different search endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn provider_error(e: impl std::error::Error + Send + Sync + 'static) -> DiscoveryError {
        DiscoveryError::Provider {
            provider: "tavily",
            source: Box::new(e),
        }
    }

    fn to_candidate(&self, result: TavilyResult, criteria: &SearchCriteria) -> Option<Candidate> {
        let host = normalized_host(&result.url)?;
        if is_excluded_host(&host) {
            return None;
        }
        if let Some(directory) = &self.directory_host {
            if host_matches(&host, directory) {
                return None;
            }
        }

        let name = organization_name(&result.title).unwrap_or_else(|| host.clone());
        let mut candidate = Candidate::new(name).with_website(result.url);
        if let Some(location) = &criteria.location {
            candidate = candidate.with_state(location.clone());
        }
        Some(candidate)
    }
}

/// Query sent to the search engine.
///
/// Commercial and location-less prompts go out verbatim; school searches with
/// a location use the structured form ("colleges Texas esports").
pub(crate) fn search_query(criteria: &SearchCriteria, prompt: &str) -> String {
    if criteria.is_commercial || criteria.location.is_none() {
        prompt.trim().to_string()
    } else {
        criteria.synthesized_query()
    }
}

/// Organization name from a page title: the part before the first
/// `" | "` or `" - "` separator.
fn organization_name(title: &str) -> Option<String> {
    let head = title
        .split(" | ")
        .next()
        .and_then(|s| s.split(" - ").next())
        .unwrap_or_default()
        .trim();
    (!head.is_empty()).then(|| head.to_string())
}

#[async_trait]
impl CandidateSource for TavilySearchSource {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn discover(
        &self,
        criteria: &SearchCriteria,
        prompt: &str,
    ) -> DiscoveryResult<Vec<Candidate>> {
        let query = search_query(criteria, prompt);
        info!(query = %query, "Searching the web for organizations");

        let request = TavilyRequest {
            api_key: &self.api_key,
            query: &query,
            search_depth: "basic",
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(Self::provider_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::provider_error(FetchError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            }));
        }

        let body: TavilyResponse = response.json().await.map_err(Self::provider_error)?;
        debug!(results = body.results.len(), "Tavily results received");

        Ok(body
            .results
            .into_iter()
            .filter_map(|r| self.to_candidate(r, criteria))
            .collect())
    }
}
