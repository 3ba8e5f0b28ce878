use crate::Result as DispatchErrorResult;

use bc_core::{Job, JobAction};
use bc_db::{CampaignRepository, JobRepository};

use std::sync::Arc;

use tokio::sync::Notify;
use uuid::Uuid;

/// What startup recovery put back on the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recovery {
    pub jobs_requeued: u64,
    pub campaigns_requeued: u64,
    pub orphans_enqueued: u64,
}

/// Durable job queue plus an in-process wake-up for the runner
#[derive(Clone)]
pub struct JobQueue {
    jobs: JobRepository,
    campaigns: CampaignRepository,
    wakeup: Arc<Notify>,
}

impl JobQueue {
    pub fn new(jobs: JobRepository, campaigns: CampaignRepository) -> Self {
        Self {
            jobs,
            campaigns,
            wakeup: Arc::new(Notify::new()),
        }
    }

    pub fn repository(&self) -> &JobRepository {
        &self.jobs
    }

    /// Enqueue a start/resume job; `false` when one is already pending
    pub async fn enqueue(&self, job: &Job) -> DispatchErrorResult<bool> {
        let enqueued = self.jobs.enqueue(job).await?;
        if enqueued {
            self.notify();
        }
        Ok(enqueued)
    }

    pub async fn claim(&self) -> DispatchErrorResult<Option<Job>> {
        Ok(self.jobs.claim_next().await?)
    }

    pub async fn complete(&self, job_id: Uuid) -> DispatchErrorResult<()> {
        Ok(self.jobs.complete(job_id).await?)
    }

    pub async fn fail(&self, job_id: Uuid, error: &str) -> DispatchErrorResult<()> {
        Ok(self.jobs.fail(job_id, error).await?)
    }

    /// Re-queue work orphaned by a crash or shutdown.
    ///
    /// Active jobs go back to pending and running campaigns back to queued;
    /// queued campaigns left without any job get a fresh resume job.
    pub async fn recover(&self) -> DispatchErrorResult<Recovery> {
        let jobs_requeued = self.jobs.requeue_active().await?;
        let campaigns_requeued = self.campaigns.requeue_running().await?;

        let mut orphans_enqueued = 0;
        for campaign_id in self.jobs.orphaned_queued_campaigns().await? {
            if self
                .jobs
                .enqueue(&Job::new(campaign_id, JobAction::Resume))
                .await?
            {
                orphans_enqueued += 1;
            }
        }

        let recovery = Recovery {
            jobs_requeued,
            campaigns_requeued,
            orphans_enqueued,
        };
        if recovery != Recovery::default() {
            log::info!(
                "Recovered {} job(s), {} campaign(s), {} orphan(s)",
                jobs_requeued,
                campaigns_requeued,
                orphans_enqueued
            );
            self.notify();
        }

        Ok(recovery)
    }

    pub fn notify(&self) {
        self.wakeup.notify_one();
    }

    pub async fn notified(&self) {
        self.wakeup.notified().await;
    }
}
