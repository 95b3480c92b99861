//! In-memory job registry.
//!
//! The registry is the single source of truth for job state. The
//! orchestrator writes lifecycle updates through it and the HTTP surface
//! reads snapshots from it. Each job carries a `watch` channel of its status
//! so the review gate can suspend without polling.
//!
//! Jobs live only for the process lifetime.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::pipeline::worker_pool::BatchOutcome;
use crate::types::{
    criteria::SearchCriteria,
    job::{Job, JobStatus},
    lead::Lead,
};

/// Progress after criteria extraction.
const PROGRESS_CRITERIA: f64 = 5.0;
/// Progress once discovery has returned candidates.
const PROGRESS_DISCOVERED: f64 = 10.0;
/// Batches never report more than this before the job completes.
const PROGRESS_BATCH_CEILING: f64 = 99.0;

struct JobEntry {
    job: Job,
    status_tx: watch::Sender<JobStatus>,
}

impl JobEntry {
    fn transition(&mut self, next: JobStatus) -> RegistryResult<()> {
        let current = self.job.status;
        if !current.can_transition_to(next) {
            return Err(RegistryError::InvalidTransition {
                job_id: self.job.id.clone(),
                from: current,
                to: next,
            });
        }
        self.job.status = next;
        if next != JobStatus::AwaitingReview {
            self.job.pending_results.clear();
        }
        self.job.touch();
        self.status_tx.send_replace(next);
        debug!(job_id = %self.job.id, from = %current, to = %next, "Job status changed");
        Ok(())
    }

    fn mark_completed(&mut self) -> RegistryResult<()> {
        self.transition(JobStatus::Completed)?;
        self.job.progress = 100.0;
        let found = self.job.results.len();
        self.job.prompt = format!(
            "{} ({} {} found)",
            self.job.prompt,
            found,
            if found == 1 { "lead" } else { "leads" }
        );
        Ok(())
    }
}

/// Thread-safe, cloneable registry keyed by job id.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, JobEntry>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job.
    pub async fn create(&self, prompt: impl Into<String>) -> Job {
        let job = Job::new(prompt);
        let (status_tx, _) = watch::channel(job.status);
        self.jobs.write().await.insert(
            job.id.clone(),
            JobEntry {
                job: job.clone(),
                status_tx,
            },
        );
        info!(job_id = %job.id, "Job created");
        job
    }

    /// Current snapshot of a job.
    pub async fn get(&self, job_id: &str) -> RegistryResult<Job> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .map(|entry| entry.job.clone())
            .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))
    }

    /// Watch a job's status changes.
    pub async fn subscribe(&self, job_id: &str) -> RegistryResult<watch::Receiver<JobStatus>> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .map(|entry| entry.status_tx.subscribe())
            .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Number of jobs not yet in a terminal state.
    pub async fn active_count(&self) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|entry| !entry.job.status.is_terminal())
            .count()
    }

    async fn update<T>(
        &self,
        job_id: &str,
        f: impl FnOnce(&mut JobEntry) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(job_id)
            .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))?;
        f(entry)
    }

    // ========================================================================
    // Orchestrator writes
    // ========================================================================

    pub async fn start_processing(&self, job_id: &str) -> RegistryResult<()> {
        self.update(job_id, |entry| entry.transition(JobStatus::Processing))
            .await
    }

    pub async fn record_criteria(&self, job_id: &str, criteria: SearchCriteria) -> RegistryResult<()> {
        self.update(job_id, |entry| {
            entry.job.criteria = Some(criteria);
            entry.job.advance_progress(PROGRESS_CRITERIA);
            entry.job.touch();
            Ok(())
        })
        .await
    }

    pub async fn record_discovery(&self, job_id: &str, total: usize) -> RegistryResult<()> {
        self.update(job_id, |entry| {
            entry.job.total_leads = total;
            entry.job.advance_progress(PROGRESS_DISCOVERED);
            entry.job.touch();
            Ok(())
        })
        .await
    }

    /// Store a finished batch. A batch with leads moves the job to
    /// `awaiting_review`; an empty batch leaves it `processing`.
    pub async fn record_batch(&self, job_id: &str, outcome: &BatchOutcome) -> RegistryResult<JobStatus> {
        self.update(job_id, |entry| {
            let job = &mut entry.job;
            job.processed_leads = (job.processed_leads + outcome.attempted).min(job.total_leads);
            job.stats.attempted += outcome.attempted;
            job.stats.succeeded += outcome.succeeded();
            job.stats.batches += 1;

            if job.total_leads > 0 {
                let fraction = job.processed_leads as f64 / job.total_leads as f64;
                let progress = PROGRESS_DISCOVERED + (100.0 - PROGRESS_DISCOVERED) * fraction;
                job.advance_progress(progress.min(PROGRESS_BATCH_CEILING));
            }
            job.touch();

            if outcome.leads.is_empty() {
                return Ok(entry.job.status);
            }

            entry.transition(JobStatus::AwaitingReview)?;
            entry.job.pending_results = outcome.leads.clone();
            Ok(JobStatus::AwaitingReview)
        })
        .await
    }

    /// Finish a job that is still processing. Returns the final snapshot.
    pub async fn complete(&self, job_id: &str) -> RegistryResult<Job> {
        self.update(job_id, |entry| {
            entry.mark_completed()?;
            info!(job_id = %entry.job.id, leads = entry.job.results.len(), "Job completed");
            Ok(entry.job.clone())
        })
        .await
    }

    /// Fail a job with a human-readable cause.
    pub async fn fail(&self, job_id: &str, error: impl Into<String>) -> RegistryResult<()> {
        let error = error.into();
        self.update(job_id, |entry| {
            entry.transition(JobStatus::Failed)?;
            info!(job_id = %entry.job.id, error = %error, "Job failed");
            entry.job.error = Some(error);
            Ok(())
        })
        .await
    }

    // ========================================================================
    // External actions
    // ========================================================================

    /// Approve the pending batch.
    ///
    /// Approved leads are matched against the current pending results by
    /// (website, name); approving a subset is allowed. The stored pending
    /// copies are appended to `results`, so client edits to scores or
    /// contacts are ignored. Unknown or repeated leads reject the whole
    /// approval without changing the job. On success the job resumes, or
    /// completes when every candidate has already been processed.
    pub async fn approve_batch(&self, job_id: &str, approved: Vec<Lead>) -> RegistryResult<Job> {
        self.update(job_id, |entry| {
            if entry.job.status != JobStatus::AwaitingReview {
                return Err(RegistryError::Conflict(format!(
                    "Job is not awaiting review (status: {})",
                    entry.job.status
                )));
            }

            let mut seen = HashSet::new();
            let mut accepted = Vec::with_capacity(approved.len());
            for lead in &approved {
                let stored = entry
                    .job
                    .pending_results
                    .iter()
                    .find(|pending| pending.review_key() == lead.review_key())
                    .ok_or_else(|| {
                        RegistryError::Conflict(format!(
                            "Approved lead \"{}\" is not part of the pending batch",
                            lead.name
                        ))
                    })?;
                if !seen.insert(lead.review_key()) {
                    return Err(RegistryError::Conflict(format!(
                        "Approved lead \"{}\" appears more than once",
                        lead.name
                    )));
                }
                accepted.push(stored.clone());
            }

            let count = accepted.len();
            entry.job.results.extend(accepted);

            if entry.job.all_processed() {
                entry.mark_completed()?;
            } else {
                entry.transition(JobStatus::Processing)?;
            }

            info!(
                job_id = %entry.job.id,
                approved = count,
                status = %entry.job.status,
                "Batch approved"
            );
            Ok(entry.job.clone())
        })
        .await
    }

    /// Cancel a job that is waiting for review.
    pub async fn cancel(&self, job_id: &str) -> RegistryResult<Job> {
        self.update(job_id, |entry| {
            if entry.job.status != JobStatus::AwaitingReview {
                return Err(RegistryError::Conflict(format!(
                    "Only jobs awaiting review can be cancelled (status: {})",
                    entry.job.status
                )));
            }
            entry.transition(JobStatus::Failed)?;
            entry.job.error = Some("Job cancelled during review".to_string());
            info!(job_id = %entry.job.id, "Job cancelled");
            Ok(entry.job.clone())
        })
        .await
    }

    // ========================================================================
    // Housekeeping
    // ========================================================================

    /// Drop terminal jobs last updated before `older_than` ago.
    pub async fn prune_finished(&self, older_than: chrono::Duration) -> usize {
        let cutoff = Utc::now() - older_than;
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, entry| !(entry.job.status.is_terminal() && entry.job.updated_at < cutoff));
        let pruned = before - jobs.len();
        if pruned > 0 {
            info!(pruned, remaining = jobs.len(), "Pruned finished jobs");
        }
        pruned
    }
}
