//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every 15 minutes)
//!     │
//!     └─► registry.prune_finished(retention)
//! ```

use anyhow::Result;
use lead_discovery::JobRegistry;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Start all scheduled tasks
pub async fn start_scheduler(registry: JobRegistry, retention: chrono::Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let prune_job = Job::new_async("0 */15 * * * *", move |_uuid, _lock| {
        let registry = registry.clone();
        Box::pin(async move {
            let pruned = registry.prune_finished(retention).await;
            tracing::debug!(pruned, "Job retention sweep finished");
        })
    })?;

    scheduler.add(prune_job).await?;
    scheduler.start().await?;

    tracing::info!(
        retention_hours = retention.num_hours(),
        "Scheduled tasks started (finished job pruning every 15 minutes)"
    );
    Ok(scheduler)
}
