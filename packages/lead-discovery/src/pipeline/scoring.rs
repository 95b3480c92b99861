//! Lead scoring.

use crate::types::{
    candidate::Candidate,
    criteria::SearchCriteria,
    lead::{Lead, PageContacts, Priority},
};

/// Label used when the page named no specific role.
pub const GENERAL_CONTACT: &str = "General Contact";

/// Leads above this estimated value are high priority.
const HIGH_PRIORITY_THRESHOLD: u32 = 10_000;

/// Estimated deal value and close probability for a contact role.
pub fn score_role(role: &str) -> (u32, u8) {
    let role = role.to_lowercase();
    if role.contains("director") || role.contains("principal") {
        (15_000, 40)
    } else if role.contains("coach") || role.contains("esports") {
        (8_500, 25)
    } else {
        (5_000, 10)
    }
}

pub fn priority_for(estimated_value: u32) -> Priority {
    if estimated_value > HIGH_PRIORITY_THRESHOLD {
        Priority::High
    } else {
        Priority::Medium
    }
}

/// Build a scored lead from a candidate's enrichment output.
///
/// Returns `None` when the page yielded neither an email nor a phone.
pub fn score_lead(
    candidate: &Candidate,
    website: &str,
    contacts: PageContacts,
    criteria: &SearchCriteria,
) -> Option<Lead> {
    if !contacts.has_contact_info() {
        return None;
    }

    let contact = contacts
        .best_contact
        .map(|c| c.role)
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| GENERAL_CONTACT.to_string());
    let (estimated_value, probability) = score_role(&contact);

    Some(Lead {
        name: candidate.name.clone(),
        website: website.to_string(),
        emails: contacts.emails,
        phones: contacts.phones,
        contact,
        state: criteria.location.clone().or_else(|| candidate.state.clone()),
        org_type: criteria.org_type,
        estimated_value,
        probability,
        priority: priority_for(estimated_value),
    })
}
