//! HTTP-backed implementations of the collaborator traits.
//!
//! - [`HttpPageFetcher`] - plain reqwest page download
//! - [`HttpDirectorySource`] / [`HttpDirectoryResolver`] - school directory listings
//! - [`TavilySearchSource`] - Tavily web search
//! - [`ContactPageEnricher`] - regex-based contact extraction

mod contacts;
mod directory;
mod http;
mod search;

pub use contacts::ContactPageEnricher;
pub use directory::{HttpDirectoryResolver, HttpDirectorySource};
pub use http::HttpPageFetcher;
pub use search::TavilySearchSource;

/// Hosts that never count as an organization's own website.
const EXCLUDED_HOSTS: &[&str] = &[
    "google.com",
    "bing.com",
    "duckduckgo.com",
    "yahoo.com",
    "baidu.com",
    "yandex.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
];

/// Lower-cased host without a leading `www.`.
pub(crate) fn normalized_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()?
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())
}

/// Whether `host` is `domain` or one of its subdomains.
pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

pub(crate) fn is_excluded_host(host: &str) -> bool {
    EXCLUDED_HOSTS.iter().any(|d| host_matches(host, d))
}
