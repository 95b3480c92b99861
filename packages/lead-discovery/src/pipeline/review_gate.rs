//! Human review checkpoint between batches.
//!
//! After a batch produced leads the job sits in `awaiting_review`. The gate
//! suspends the orchestrator on the job's status channel until an external
//! approval or cancellation moves it on.

use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::JobRegistry;
use crate::types::job::JobStatus;

/// What the reviewer decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Approved; more candidates remain
    Resume,
    /// Approved and the approval finished the job
    Finished,
    /// Cancelled while waiting
    Cancelled,
}

#[derive(Clone)]
pub struct ReviewGate {
    registry: JobRegistry,
}

impl ReviewGate {
    pub fn new(registry: JobRegistry) -> Self {
        Self { registry }
    }

    /// Suspend until the job leaves `awaiting_review`.
    ///
    /// Returns immediately when the decision was made before the call.
    pub async fn wait(&self, job_id: &str) -> RegistryResult<ReviewDecision> {
        let mut status_rx = self.registry.subscribe(job_id).await?;
        debug!(job_id, "Waiting for batch review");

        let status = *status_rx
            .wait_for(|status| *status != JobStatus::AwaitingReview)
            .await
            .map_err(|_| RegistryError::NotFound(job_id.to_string()))?;

        let decision = match status {
            JobStatus::Completed => ReviewDecision::Finished,
            JobStatus::Failed => ReviewDecision::Cancelled,
            JobStatus::Pending | JobStatus::Processing | JobStatus::AwaitingReview => {
                ReviewDecision::Resume
            }
        };
        info!(job_id, ?decision, "Batch review resolved");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::worker_pool::BatchOutcome;
    use crate::types::{criteria::OrganizationType, lead::{Lead, Priority}};
    use std::time::Duration;

    fn lead() -> Lead {
        Lead {
            name: "North High".to_string(),
            website: "https://north.example".to_string(),
            emails: vec!["ad@north.example".to_string()],
            phones: vec![],
            contact: "Coach".to_string(),
            state: None,
            org_type: OrganizationType::HighSchool,
            estimated_value: 8_500,
            probability: 25,
            priority: Priority::Medium,
        }
    }

    async fn awaiting(registry: &JobRegistry, total: usize) -> String {
        let job = registry.create("high schools").await;
        registry.start_processing(&job.id).await.unwrap();
        registry.record_discovery(&job.id, total).await.unwrap();
        registry
            .record_batch(&job.id, &BatchOutcome { leads: vec![lead()], attempted: 1 })
            .await
            .unwrap();
        job.id
    }

    #[tokio::test]
    async fn test_wait_resumes_on_approval() {
        let registry = JobRegistry::new();
        let id = awaiting(&registry, 5).await;
        let gate = ReviewGate::new(registry.clone());

        let waiter = tokio::spawn({
            let id = id.clone();
            async move { gate.wait(&id).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        registry.approve_batch(&id, vec![lead()]).await.unwrap();

        assert_eq!(waiter.await.unwrap().unwrap(), ReviewDecision::Resume);
    }

    #[tokio::test]
    async fn test_wait_reports_cancellation() {
        let registry = JobRegistry::new();
        let id = awaiting(&registry, 5).await;
        let gate = ReviewGate::new(registry.clone());

        registry.cancel(&id).await.unwrap();

        assert_eq!(gate.wait(&id).await.unwrap(), ReviewDecision::Cancelled);
    }

    #[tokio::test]
    async fn test_wait_reports_finished_job() {
        let registry = JobRegistry::new();
        let id = awaiting(&registry, 1).await;
        let gate = ReviewGate::new(registry.clone());

        registry.approve_batch(&id, vec![]).await.unwrap();

        assert_eq!(gate.wait(&id).await.unwrap(), ReviewDecision::Finished);
    }
}
