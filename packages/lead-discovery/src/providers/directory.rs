//! School directory listing provider.
//!
//! The listing URL is a template containing `{state}`, replaced by the
//! lower-case, hyphenated state name (`new-york`). Every link on the listing
//! page that points deeper under the listing path is one directory entry.
//! Entries carry no website; the worker pool resolves them through
//! [`HttpDirectoryResolver`].

use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

use super::{host_matches, is_excluded_host, normalized_host, HttpPageFetcher};
use crate::error::{DiscoveryError, DiscoveryResult, FetchError, FetchResult};
use crate::traits::{fetcher::PageFetcher, resolver::DirectoryResolver, source::CandidateSource};
use crate::types::{candidate::Candidate, criteria::SearchCriteria};

/// Anchor text hinting at an organization's own website.
const WEBSITE_LINK_HINTS: &[&str] = &["website", "visit", "homepage", "home page"];

fn state_slug(state: &str) -> String {
    state
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

lazy_static! {
    static ref ANCHOR_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
}

// =============================================================================
// Listing
// =============================================================================

/// Candidate source backed by a directory listing page per state.
pub struct HttpDirectorySource {
    fetcher: HttpPageFetcher,
    listing_template: String,
}

impl HttpDirectorySource {
    pub fn new(fetcher: HttpPageFetcher, listing_template: impl Into<String>) -> Self {
        Self {
            fetcher,
            listing_template: listing_template.into(),
        }
    }

    /// Host of the directory, used to keep search results from pointing
    /// back at it.
    pub fn host(&self) -> Option<String> {
        normalized_host(&self.listing_url("state"))
    }

    fn listing_url(&self, state: &str) -> String {
        self.listing_template.replace("{state}", &state_slug(state))
    }
}

/// Parse listing entries from a listing page.
pub(crate) fn parse_listing(html: &str, listing_url: &Url, state: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let listing_path = listing_url.path().trim_end_matches('/').to_string();
    let mut seen = HashSet::new();

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let url = listing_url.join(href).ok()?;
            if url.host_str() != listing_url.host_str() {
                return None;
            }
            let path = url.path().trim_end_matches('/');
            if path.len() <= listing_path.len() + 1 || !path.starts_with(&format!("{}/", listing_path)) {
                return None;
            }

            let name = a.text().collect::<Vec<_>>().join(" ");
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return None;
            }

            let mut url = url;
            url.set_fragment(None);
            let reference = url.to_string();
            if !seen.insert(reference.clone()) {
                return None;
            }

            Some(
                Candidate::new(name)
                    .with_directory_ref(reference)
                    .with_state(state),
            )
        })
        .collect()
}

#[async_trait]
impl CandidateSource for HttpDirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn applies_to(&self, criteria: &SearchCriteria) -> bool {
        criteria.is_directory_search()
    }

    async fn discover(
        &self,
        criteria: &SearchCriteria,
        _prompt: &str,
    ) -> DiscoveryResult<Vec<Candidate>> {
        let Some(state) = criteria.location.as_deref() else {
            return Ok(Vec::new());
        };

        let listing = self.listing_url(state);
        let listing_url = Url::parse(&listing).map_err(|e| DiscoveryError::Provider {
            provider: "directory",
            source: Box::new(e),
        })?;

        info!(url = %listing, "Fetching directory listing");
        let html = self
            .fetcher
            .fetch(&listing)
            .await
            .map_err(|e| DiscoveryError::Provider {
                provider: "directory",
                source: Box::new(e),
            })?;

        let candidates = parse_listing(&html, &listing_url, state);
        debug!(count = candidates.len(), "Directory entries parsed");
        Ok(candidates)
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Follows a directory entry page to the organization's own website.
pub struct HttpDirectoryResolver {
    fetcher: HttpPageFetcher,
}

impl HttpDirectoryResolver {
    pub fn new(fetcher: HttpPageFetcher) -> Self {
        Self { fetcher }
    }
}

/// Pick the canonical external link from a directory entry page.
///
/// Links whose text mentions the website win; otherwise the first external
/// link that is not a search engine or social network.
pub(crate) fn canonical_link(html: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let page_host = page_url
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())?;

    let external: Vec<(String, String)> = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| {
            let url = page_url.join(a.value().attr("href")?).ok()?;
            if !matches!(url.scheme(), "http" | "https") {
                return None;
            }
            let host = normalized_host(url.as_str())?;
            if host_matches(&host, &page_host) || is_excluded_host(&host) {
                return None;
            }
            let label = format!(
                "{} {}",
                a.text().collect::<String>(),
                a.value().attr("title").unwrap_or_default()
            )
            .to_lowercase();
            Some((url.to_string(), label))
        })
        .collect();

    external
        .iter()
        .find(|(_, label)| WEBSITE_LINK_HINTS.iter().any(|h| label.contains(h)))
        .or_else(|| external.first())
        .map(|(url, _)| url.clone())
}

#[async_trait]
impl DirectoryResolver for HttpDirectoryResolver {
    async fn resolve_canonical_link(&self, directory_ref: &str) -> FetchResult<Option<String>> {
        let page_url = Url::parse(directory_ref).map_err(|_| FetchError::InvalidUrl {
            url: directory_ref.to_string(),
        })?;
        let html = self.fetcher.fetch(directory_ref).await?;
        Ok(canonical_link(&html, &page_url))
    }
}
