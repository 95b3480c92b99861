//! Candidate organizations produced by discovery.

use serde::{Deserialize, Serialize};

/// A not-yet-verified organization.
///
/// Candidates live only inside one orchestrator run and are never exposed
/// to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,

    /// Direct website, when discovery knows it
    pub website: Option<String>,

    /// Directory page that links to the organization's website
    pub directory_ref: Option<String>,

    /// Location tag (US state)
    pub state: Option<String>,
}

impl Candidate {
    /// Create a candidate with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
            directory_ref: None,
            state: None,
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_directory_ref(mut self, directory_ref: impl Into<String>) -> Self {
        self.directory_ref = Some(directory_ref.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Key used to drop duplicate discoveries.
    ///
    /// Websites collapse on host plus path, ignoring `www.`, case, query and
    /// a trailing slash. `https://a.org/` and `https://www.a.org` count once,
    /// while `https://district.org/north` and `https://district.org/south`
    /// stay distinct.
    pub fn dedupe_key(&self) -> String {
        if let Some(website) = &self.website {
            if let Some(key) = url::Url::parse(website).ok().and_then(|u| {
                let host = u.host_str()?.trim_start_matches("www.").to_lowercase();
                let path = u.path().trim_end_matches('/').to_lowercase();
                Some(format!("{}{}", host, path))
            }) {
                return key;
            }
            return website.trim_end_matches('/').to_lowercase();
        }
        if let Some(directory_ref) = &self.directory_ref {
            return directory_ref.to_lowercase();
        }
        self.name.to_lowercase()
    }
}
