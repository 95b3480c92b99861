//! Structured search criteria extracted from a free-text prompt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of organization a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrganizationType {
    #[default]
    #[serde(rename = "high school")]
    HighSchool,
    #[serde(rename = "college")]
    College,
    #[serde(rename = "university")]
    University,
    #[serde(rename = "business")]
    Business,
}

impl OrganizationType {
    /// Human-readable label, also used when synthesizing search queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSchool => "high school",
            Self::College => "college",
            Self::University => "university",
            Self::Business => "business",
        }
    }

    /// Schools, colleges and universities are listed in the directory.
    pub fn is_school(&self) -> bool {
        !matches!(self, Self::Business)
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured criteria derived from a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Matched region (US state) name, properly capitalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "type")]
    pub org_type: OrganizationType,

    /// Interest keywords found in the prompt
    #[serde(default)]
    pub keywords: Vec<String>,

    /// True only for business searches
    pub is_commercial: bool,
}

impl SearchCriteria {
    /// Whether the directory listing can serve this search.
    pub fn is_directory_search(&self) -> bool {
        !self.is_commercial && self.org_type.is_school() && self.location.is_some()
    }

    /// Query of the form `"{type} {location} {keywords}"`.
    pub fn synthesized_query(&self) -> String {
        let mut parts = vec![format!("{}s", self.org_type.as_str())];
        if let Some(location) = &self.location {
            parts.push(location.clone());
        }
        parts.extend(self.keywords.iter().cloned());
        parts.join(" ")
    }
}
