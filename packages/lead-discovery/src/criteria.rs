//! Criteria extraction from free-text prompts.
//!
//! Plain substring matching against fixed vocabularies. No network calls,
//! never fails: anything unrecognized is simply left out.

use crate::types::criteria::{OrganizationType, SearchCriteria};

/// Known regions, matched case-insensitively.
const REGIONS: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
    "Connecticut", "Delaware", "District of Columbia", "Florida", "Georgia",
    "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky",
    "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire",
    "New Jersey", "New Mexico", "New York", "North Carolina", "North Dakota",
    "Ohio", "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island",
    "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah", "Vermont",
    "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

const BUSINESS_TERMS: &[&str] = &[
    "business",
    "company",
    "companies",
    "corporate",
    "enterprise",
    "startup",
    "store",
    "shop",
    "agency",
];

const KEYWORDS: &[&str] = &[
    "esports",
    "athletics",
    "sports",
    "technology",
    "gaming",
    "stem",
    "robotics",
];

/// Parse a prompt into structured search criteria.
pub fn extract_criteria(prompt: &str) -> SearchCriteria {
    let lower = prompt.to_lowercase();
    let org_type = classify_type(&lower);

    SearchCriteria {
        location: match_region(&lower),
        org_type,
        keywords: match_keywords(&lower),
        is_commercial: org_type == OrganizationType::Business,
    }
}

/// Whole words only: "esports" must not also yield "sports".
fn match_keywords(lower: &str) -> Vec<String> {
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    KEYWORDS
        .iter()
        .filter(|k| words.contains(k))
        .map(|k| k.to_string())
        .collect()
}

/// Longest names first so "West Virginia" beats "Virginia" and "Arkansas"
/// beats "Kansas".
fn match_region(lower: &str) -> Option<String> {
    let mut regions: Vec<&str> = REGIONS.to_vec();
    regions.sort_by_key(|r| std::cmp::Reverse(r.len()));
    regions
        .into_iter()
        .find(|r| lower.contains(&r.to_lowercase()))
        .map(str::to_string)
}

fn classify_type(lower: &str) -> OrganizationType {
    if lower.contains("high school") {
        OrganizationType::HighSchool
    } else if lower.contains("college") {
        OrganizationType::College
    } else if lower.contains("university") || lower.contains("universities") {
        OrganizationType::University
    } else if BUSINESS_TERMS.iter().any(|t| lower.contains(t)) {
        OrganizationType::Business
    } else {
        OrganizationType::HighSchool
    }
}
