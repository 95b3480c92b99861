//! Job model and lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::criteria::SearchCriteria;
use super::lead::Lead;

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    AwaitingReview,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::AwaitingReview => "awaiting_review",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Failed)
                | (Processing, AwaitingReview)
                | (Processing, Completed)
                | (AwaitingReview, Processing)
                | (AwaitingReview, Completed)
                | (AwaitingReview, Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Enrichment counters. Per-candidate failures are never surfaced as errors,
/// so these are the only trace of how many were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub batches: usize,
}

// ============================================================================
// Job Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub prompt: String,
    pub status: JobStatus,

    /// Approved leads, append-only
    pub results: Vec<Lead>,

    /// Latest unapproved batch
    pub pending_results: Vec<Lead>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub progress: f64,
    pub total_leads: usize,
    pub processed_leads: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<SearchCriteria>,

    pub stats: EnrichmentStats,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a pending job for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            status: JobStatus::Pending,
            results: Vec::new(),
            pending_results: Vec::new(),
            error: None,
            progress: 0.0,
            total_leads: 0,
            processed_leads: 0,
            criteria: None,
            stats: EnrichmentStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Every discovered candidate has been through the worker pool.
    pub fn all_processed(&self) -> bool {
        self.processed_leads >= self.total_leads
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Raise progress without ever moving it backwards.
    pub(crate) fn advance_progress(&mut self, progress: f64) {
        self.progress = self.progress.max(progress.clamp(0.0, 100.0));
    }
}
