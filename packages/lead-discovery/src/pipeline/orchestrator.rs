//! Pipeline orchestrator.
//!
//! One detached task per job drives the whole run:
//!
//! ```text
//! submit(prompt) ──► registry.create ──► spawn ──► return Job
//!                                          │
//!                                          ├─► extract_criteria
//!                                          ├─► Discovery
//!                                          └─► for each batch (sequential):
//!                                                  ├─► EnrichmentWorkerPool
//!                                                  ├─► registry.record_batch
//!                                                  └─► ReviewGate (if leads)
//! ```
//!
//! Nothing inside a batch aborts the job. Only discovery exhaustion and
//! unexpected errors end it as `failed`.

use std::sync::Arc;

use tracing::{error, info, warn, Instrument};

use super::discovery::Discovery;
use super::review_gate::{ReviewDecision, ReviewGate};
use super::worker_pool::EnrichmentWorkerPool;
use crate::criteria::extract_criteria;
use crate::error::{PipelineError, Result};
use crate::registry::JobRegistry;
use crate::types::job::{Job, JobStatus};

/// Drives discovery and enrichment for submitted jobs.
#[derive(Clone)]
pub struct Orchestrator {
    registry: JobRegistry,
    discovery: Arc<Discovery>,
    pool: Arc<EnrichmentWorkerPool>,
    gate: ReviewGate,
}

impl Orchestrator {
    pub fn new(registry: JobRegistry, discovery: Discovery, pool: EnrichmentWorkerPool) -> Self {
        Self {
            gate: ReviewGate::new(registry.clone()),
            registry,
            discovery: Arc::new(discovery),
            pool: Arc::new(pool),
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Create a job and start its background run. Returns immediately with
    /// the freshly created job.
    pub async fn submit(&self, prompt: &str) -> Job {
        let job = self.registry.create(prompt.trim()).await;

        let orchestrator = self.clone();
        let job_id = job.id.clone();
        let span = tracing::info_span!("lead_job", job_id = %job_id);
        tokio::spawn(
            async move {
                // A panic inside the run is caught by this inner task.
                let runner = orchestrator.clone();
                let id = job_id.clone();
                let outcome = tokio::spawn(async move { runner.run(&id).await }).await;

                let failure = match outcome {
                    Ok(Ok(())) => None,
                    Ok(Err(e)) => Some(e),
                    Err(join_error) => Some(PipelineError::Internal(join_error.to_string())),
                };

                if let Some(e) = failure {
                    error!(error = %e, "Lead job failed");
                    if let Err(fail_error) = orchestrator.registry.fail(&job_id, e.to_string()).await {
                        warn!(error = %fail_error, "Could not record job failure");
                    }
                }
            }
            .instrument(span),
        );

        job
    }

    /// Run one job to a terminal state.
    async fn run(&self, job_id: &str) -> Result<()> {
        self.registry.start_processing(job_id).await?;
        let job = self.registry.get(job_id).await?;

        let criteria = extract_criteria(&job.prompt);
        info!(
            location = criteria.location.as_deref().unwrap_or("any"),
            org_type = %criteria.org_type,
            keywords = ?criteria.keywords,
            "Criteria extracted"
        );
        self.registry.record_criteria(job_id, criteria.clone()).await?;

        let candidates = self.discovery.discover(&criteria, &job.prompt).await?;
        self.registry.record_discovery(job_id, candidates.len()).await?;
        info!(candidates = candidates.len(), "Discovery complete");

        let batch_size = self.pool.concurrency();
        let batch_count = candidates.len().div_ceil(batch_size);
        let mut leads_found = 0;

        for (index, batch) in candidates.chunks(batch_size).enumerate() {
            info!(batch = index + 1, of = batch_count, size = batch.len(), "Processing batch");

            let outcome = self.pool.enrich_batch(batch, &criteria).await;
            leads_found += outcome.succeeded();

            if self.registry.record_batch(job_id, &outcome).await? != JobStatus::AwaitingReview {
                continue;
            }

            match self.gate.wait(job_id).await? {
                ReviewDecision::Resume => {}
                ReviewDecision::Finished => return Ok(()),
                ReviewDecision::Cancelled => {
                    info!(batch = index + 1, "Job cancelled during review, stopping");
                    return Ok(());
                }
            }
        }

        if self.registry.get(job_id).await?.status != JobStatus::Processing {
            return Ok(());
        }

        if leads_found == 0 {
            return Err(PipelineError::NoLeadsFound {
                attempted: candidates.len(),
            });
        }

        self.registry.complete(job_id).await?;
        Ok(())
    }
}
