//! Regex-based contact extraction from organization pages.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::FetchResult;
use crate::traits::enricher::PageEnricher;
use crate::types::lead::{BestContact, PageContacts};

/// Cap per page; staff directories can list hundreds of addresses.
const MAX_EMAILS: usize = 10;
const MAX_PHONES: usize = 5;

/// Role vocabulary in preference order. The first one mentioned on the page
/// becomes the best contact.
const ROLES: &[&str] = &[
    "Athletic Director",
    "Activities Director",
    "Esports Coach",
    "Esports Advisor",
    "Principal",
    "Director",
    "Head Coach",
    "Coach",
    "Superintendent",
    "Dean",
    "Owner",
    "Manager",
];

/// Address-like strings that are really asset names (`logo@2x.png`).
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b"
    ).unwrap();

    // US numbers with optional country code
    static ref PHONE_REGEX: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?\(?\b[2-9][0-9]{2}\)?[-.\s]?[0-9]{3}[-.\s][0-9]{4}\b"
    ).unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();

    static ref LINK_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
    static ref TEXT_SELECTOR: Selector = Selector::parse("body").unwrap();
}

/// Extracts emails, phones and the most senior contact role from HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactPageEnricher;

impl ContactPageEnricher {
    pub fn new() -> Self {
        Self
    }
}

fn push_unique(list: &mut Vec<String>, value: String, cap: usize) {
    if list.len() < cap && !list.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
        list.push(value);
    }
}

fn is_asset(email: &str) -> bool {
    let lower = email.to_lowercase();
    ASSET_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Visible page text, whitespace collapsed. Falls back to the whole document
/// for fragments without a body.
fn page_text(document: &Html) -> String {
    let text: String = match document.select(&TEXT_SELECTOR).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };
    WHITESPACE_REGEX.replace_all(&text, " ").into_owned()
}

pub(crate) fn extract_contacts(html: &str) -> PageContacts {
    let document = Html::parse_document(html);
    let mut emails = Vec::new();
    let mut phones = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let Some(address) = href.strip_prefix("mailto:") {
            let address = address.split('?').next().unwrap_or_default().trim();
            if EMAIL_REGEX.is_match(address) && !is_asset(address) {
                push_unique(&mut emails, address.to_lowercase(), MAX_EMAILS);
            }
        } else if let Some(number) = href.strip_prefix("tel:") {
            let number = number.trim();
            if number.chars().filter(char::is_ascii_digit).count() >= 10 {
                push_unique(&mut phones, number.to_string(), MAX_PHONES);
            }
        }
    }

    let text = page_text(&document);
    for m in EMAIL_REGEX.find_iter(&text) {
        if !is_asset(m.as_str()) {
            push_unique(&mut emails, m.as_str().to_lowercase(), MAX_EMAILS);
        }
    }
    for m in PHONE_REGEX.find_iter(&text) {
        push_unique(&mut phones, m.as_str().trim().to_string(), MAX_PHONES);
    }

    let lower = text.to_lowercase();
    let best_contact = ROLES
        .iter()
        .find(|role| lower.contains(&role.to_lowercase()))
        .map(|role| BestContact {
            role: role.to_string(),
        });

    PageContacts {
        emails,
        phones,
        best_contact,
    }
}

#[async_trait]
impl PageEnricher for ContactPageEnricher {
    async fn enrich(&self, _url: &str, html: &str) -> FetchResult<PageContacts> {
        Ok(extract_contacts(html))
    }
}
