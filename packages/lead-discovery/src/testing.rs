//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{DiscoveryError, DiscoveryResult, FetchError, FetchResult};
use crate::traits::{
    enricher::PageEnricher, fetcher::PageFetcher, resolver::DirectoryResolver,
    source::CandidateSource,
};
use crate::types::{
    candidate::Candidate,
    criteria::SearchCriteria,
    lead::{BestContact, PageContacts},
};

// =============================================================================
// Mock Candidate Source
// =============================================================================

/// Candidate source returning a fixed list.
pub struct MockCandidateSource {
    name: &'static str,
    candidates: Vec<Candidate>,
    fail: bool,
    panic: bool,
    directory_only: bool,
    calls: AtomicUsize,
}

impl MockCandidateSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            candidates: Vec::new(),
            fail: false,
            panic: false,
            directory_only: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Every call returns a provider error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Every call panics, as a provider bug would.
    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    /// Only apply to searches the directory can serve.
    pub fn directory_only(mut self) -> Self {
        self.directory_only = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandidateSource for MockCandidateSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn applies_to(&self, criteria: &SearchCriteria) -> bool {
        !self.directory_only || criteria.is_directory_search()
    }

    async fn discover(
        &self,
        _criteria: &SearchCriteria,
        _prompt: &str,
    ) -> DiscoveryResult<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("{} source crashed", self.name);
        }
        if self.fail {
            return Err(DiscoveryError::Provider {
                provider: self.name,
                source: "mock provider failure".into(),
            });
        }
        Ok(self.candidates.clone())
    }
}

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Page fetcher serving canned HTML. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockPageFetcher {
    pages: RwLock<HashMap<String, String>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Delay every fetch, to observe concurrency or trigger timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs fetched, in call order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

// =============================================================================
// Mock Page Enricher
// =============================================================================

/// Enricher returning configured contacts per URL; unknown URLs yield nothing.
#[derive(Default)]
pub struct MockPageEnricher {
    contacts: RwLock<HashMap<String, PageContacts>>,
    fallback: Option<PageContacts>,
    calls: AtomicUsize,
}

impl MockPageEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    fn contacts_of(emails: &[&str], role: Option<&str>) -> PageContacts {
        PageContacts {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            phones: Vec::new(),
            best_contact: role.map(|r| BestContact {
                role: r.to_string(),
            }),
        }
    }

    pub fn with_contacts(self, url: &str, emails: &[&str], role: Option<&str>) -> Self {
        self.contacts
            .write()
            .unwrap()
            .insert(url.to_string(), Self::contacts_of(emails, role));
        self
    }

    /// Contacts returned for every URL without a specific entry.
    pub fn with_contacts_for_all(mut self, emails: &[&str], role: Option<&str>) -> Self {
        self.fallback = Some(Self::contacts_of(emails, role));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageEnricher for MockPageEnricher {
    async fn enrich(&self, url: &str, _html: &str) -> FetchResult<PageContacts> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .contacts
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Directory Resolver
// =============================================================================

/// Resolver mapping directory references to websites.
#[derive(Default)]
pub struct MockDirectoryResolver {
    links: RwLock<HashMap<String, String>>,
}

impl MockDirectoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(self, directory_ref: &str, website: &str) -> Self {
        self.links
            .write()
            .unwrap()
            .insert(directory_ref.to_string(), website.to_string());
        self
    }
}

#[async_trait]
impl DirectoryResolver for MockDirectoryResolver {
    async fn resolve_canonical_link(&self, directory_ref: &str) -> FetchResult<Option<String>> {
        Ok(self.links.read().unwrap().get(directory_ref).cloned())
    }
}
