//! Scored, contact-enriched leads.

use serde::{Deserialize, Serialize};

use super::criteria::OrganizationType;

/// Outreach priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// Contact role found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestContact {
    pub role: String,
}

/// Output of the page enrichment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContacts {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    pub best_contact: Option<BestContact>,
}

impl PageContacts {
    /// A page is useful once it yields any way to reach someone.
    pub fn has_contact_info(&self) -> bool {
        !self.emails.is_empty() || !self.phones.is_empty()
    }
}

/// An enriched candidate ready for outreach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub name: String,
    pub website: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,

    /// Matched role label
    pub contact: String,

    pub state: Option<String>,

    #[serde(rename = "type")]
    pub org_type: OrganizationType,

    pub estimated_value: u32,
    pub probability: u8,
    pub priority: Priority,
}

impl Lead {
    /// Identity used when matching approvals against pending results.
    pub fn review_key(&self) -> (&str, &str) {
        (self.website.as_str(), self.name.as_str())
    }
}
