use crate::{
    DispatchMetrics, DispatchWorker, JobQueue, ProgressTracker, RunOutcome, ShutdownCoordinator,
};

use bc_core::Job;
use bc_db::CampaignRepository;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Claims jobs and runs them on a bounded pool of worker tasks
pub struct JobRunner {
    queue: JobQueue,
    worker: DispatchWorker,
    campaigns: CampaignRepository,
    tracker: ProgressTracker,
    semaphore: Arc<Semaphore>,
    pool_size: usize,
    poll_interval: Duration,
    shutdown: ShutdownCoordinator,
    metrics: DispatchMetrics,
}

impl JobRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: JobQueue,
        worker: DispatchWorker,
        campaigns: CampaignRepository,
        tracker: ProgressTracker,
        pool_size: usize,
        poll_interval: Duration,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let pool_size = pool_size.max(1);
        Self {
            queue,
            worker,
            campaigns,
            tracker,
            semaphore: Arc::new(Semaphore::new(pool_size)),
            pool_size,
            poll_interval,
            shutdown,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Recover, then claim and run jobs until shutdown. Waits for in-flight
    /// workers before returning.
    pub async fn run(self) {
        if let Err(e) = self.queue.recover().await {
            log::error!("Job recovery failed: {}", e);
        }

        log::info!(
            "Job runner started ({} workers, poll every {:?})",
            self.pool_size,
            self.poll_interval
        );

        let mut guard = self.shutdown.subscribe_guard();

        loop {
            let permit = tokio::select! {
                permit = self.semaphore.clone().acquire_owned() => permit,
                _ = guard.wait() => break,
            };
            let Ok(permit) = permit else {
                break;
            };

            match self.queue.claim().await {
                Ok(Some(job)) => {
                    self.metrics.job_claimed();
                    self.spawn(job, permit);
                    continue;
                }
                Ok(None) => drop(permit),
                Err(e) => {
                    log::error!("Failed to claim job: {}", e);
                    drop(permit);
                }
            }

            tokio::select! {
                _ = self.queue.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = guard.wait() => break,
            }
        }

        log::info!("Job runner stopping, waiting for workers");
        let _ = self.semaphore.acquire_many(self.pool_size as u32).await;
        log::info!("Job runner stopped");
    }

    fn spawn(&self, job: Job, permit: OwnedSemaphorePermit) {
        let worker = self.worker.clone();
        let queue = self.queue.clone();
        let campaigns = self.campaigns.clone();
        let tracker = self.tracker.clone();
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let _permit = permit;
            process_job(&worker, &queue, &campaigns, &tracker, &metrics, &job).await;
            // A job of the same campaign may have been waiting on this one
            queue.notify();
        });
    }
}

/// Run one claimed job and settle its queue state
pub async fn process_job(
    worker: &DispatchWorker,
    queue: &JobQueue,
    campaigns: &CampaignRepository,
    tracker: &ProgressTracker,
    metrics: &DispatchMetrics,
    job: &Job,
) -> Option<RunOutcome> {
    match worker.run(job).await {
        Ok(RunOutcome::Interrupted) => Some(RunOutcome::Interrupted),
        Ok(outcome) => {
            if let Err(e) = queue.complete(job.id).await {
                log::error!("Failed to complete job {}: {}", job.id, e);
            }
            Some(outcome)
        }
        Err(e) => {
            let reason = e.to_string();
            log::error!("Campaign {} failed: {}", job.campaign_id, reason);
            metrics.job_failed();

            match campaigns.mark_failed(job.campaign_id, &reason).await {
                Ok(true) => tracker.publish_status(job.campaign_id, Some(reason.clone())).await,
                Ok(false) => {}
                Err(e) => log::error!("Failed to mark campaign {} failed: {}", job.campaign_id, e),
            }
            if let Err(e) = queue.fail(job.id, &reason).await {
                log::error!("Failed to record job {} failure: {}", job.id, e);
            }
            None
        }
    }
}
