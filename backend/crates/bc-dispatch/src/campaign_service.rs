//! Control API over campaigns: create, inspect, and start/pause/resume/stop.
//!
//! Every operation is scoped to the calling owner; a campaign owned by
//! someone else is reported as not found.

use crate::{
    ControlSignals, DispatchError, DispatchMetrics, JobQueue, ProgressTracker, RecipientResolver,
    Result as DispatchErrorResult, SenderPool,
};

use bc_core::{
    ActionOutcome, Campaign, CampaignStatus, DeliveryAttempt, DeliveryRecord, DeliveryStatus, Job,
    JobAction, JobState, ProgressSnapshot, RecipientFilter,
};
use bc_db::{CampaignRepository, DeliveryRepository};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Attempts at a compare-and-set status flip before reporting a conflict
const CONTROL_RETRIES: usize = 3;

/// Result of a control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlOutcome {
    pub campaign_id: Uuid,
    pub status: CampaignStatus,
    /// `false` for idempotent no-ops
    pub changed: bool,
}

#[derive(Clone)]
pub struct CampaignService {
    campaigns: CampaignRepository,
    deliveries: DeliveryRepository,
    queue: JobQueue,
    resolver: RecipientResolver,
    senders: SenderPool,
    tracker: ProgressTracker,
    signals: ControlSignals,
    metrics: DispatchMetrics,
}

impl CampaignService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        campaigns: CampaignRepository,
        deliveries: DeliveryRepository,
        queue: JobQueue,
        resolver: RecipientResolver,
        senders: SenderPool,
        tracker: ProgressTracker,
        signals: ControlSignals,
    ) -> Self {
        Self {
            campaigns,
            deliveries,
            queue,
            resolver,
            senders,
            tracker,
            signals,
            metrics: DispatchMetrics::new(),
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        name: String,
        message: String,
        filter: RecipientFilter,
    ) -> DispatchErrorResult<Campaign> {
        let campaign = Campaign::new(owner_id, name, message, filter)?;
        self.campaigns.create(&campaign).await?;
        log::info!("Created campaign {} for owner {}", campaign.id, owner_id);
        Ok(campaign)
    }

    pub async fn get(&self, owner_id: Uuid, campaign_id: Uuid) -> DispatchErrorResult<Campaign> {
        self.campaigns
            .find_by_id(campaign_id)
            .await?
            .filter(|c| c.owner_id == owner_id)
            .ok_or_else(|| DispatchError::not_found("Campaign", campaign_id))
    }

    pub async fn list(&self, owner_id: Uuid) -> DispatchErrorResult<Vec<Campaign>> {
        Ok(self.campaigns.find_by_owner(owner_id).await?)
    }

    /// Materialize the recipient snapshot and queue the first run.
    ///
    /// No-op when already queued or running. Resolution and sender checks
    /// leave the campaign in draft; a storage failure past resolution marks
    /// it failed.
    pub async fn start(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
    ) -> DispatchErrorResult<ControlOutcome> {
        let campaign = self.get(owner_id, campaign_id).await?;
        if campaign.status.check_action(JobAction::Start)? == ActionOutcome::NoOp {
            return Ok(unchanged(campaign_id, campaign.status));
        }

        self.require_sender(owner_id).await?;
        let recipients = self.resolver.resolve(owner_id, &campaign.filter).await?;

        let job = Job::new(campaign_id, JobAction::Start);
        match self
            .deliveries
            .materialize(campaign_id, &recipients, &job)
            .await
        {
            Ok(Some(total)) => {
                log::info!("Campaign {} queued with {} recipients", campaign_id, total);
                self.metrics.control_applied(JobAction::Start);
                self.queue.notify();
                self.tracker.publish_status(campaign_id, None).await;
                Ok(changed(campaign_id, CampaignStatus::Queued))
            }
            Ok(None) => {
                // Lost a race with another control call
                let status = self.current_status(campaign_id).await?;
                status.check_action(JobAction::Start)?;
                Ok(unchanged(campaign_id, status))
            }
            Err(e) => {
                let reason = format!("Failed to materialize recipients: {}", e);
                log::error!("Campaign {}: {}", campaign_id, reason);
                if self.campaigns.mark_failed(campaign_id, &reason).await? {
                    self.tracker.publish_status(campaign_id, Some(reason)).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn pause(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
    ) -> DispatchErrorResult<ControlOutcome> {
        self.halt(owner_id, campaign_id, JobAction::Pause).await
    }

    pub async fn stop(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
    ) -> DispatchErrorResult<ControlOutcome> {
        self.halt(owner_id, campaign_id, JobAction::Stop).await
    }

    /// paused -> queued with a fresh resume job; senders are re-checked
    pub async fn resume(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
    ) -> DispatchErrorResult<ControlOutcome> {
        for _ in 0..CONTROL_RETRIES {
            let status = self.get(owner_id, campaign_id).await?.status;
            if status.check_action(JobAction::Resume)? == ActionOutcome::NoOp {
                return Ok(unchanged(campaign_id, status));
            }

            self.require_sender(owner_id).await?;

            let job = Job::new(campaign_id, JobAction::Resume);
            if self.queue.repository().enqueue_resume(&job).await? {
                log::info!("Campaign {} resumed", campaign_id);
                self.metrics.control_applied(JobAction::Resume);
                self.queue.notify();
                self.tracker.publish_status(campaign_id, None).await;
                return Ok(changed(campaign_id, CampaignStatus::Queued));
            }
        }

        Err(DispatchError::conflict(format!(
            "Campaign {} changed concurrently",
            campaign_id
        )))
    }

    pub async fn progress(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
    ) -> DispatchErrorResult<ProgressSnapshot> {
        self.get(owner_id, campaign_id).await?;
        self.tracker.snapshot(campaign_id).await
    }

    pub async fn deliveries(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
        status: Option<DeliveryStatus>,
        limit: i64,
        offset: i64,
    ) -> DispatchErrorResult<Vec<DeliveryRecord>> {
        self.get(owner_id, campaign_id).await?;
        Ok(self
            .deliveries
            .list(campaign_id, status, limit, offset)
            .await?)
    }

    pub async fn attempts(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
        recipient_id: Uuid,
    ) -> DispatchErrorResult<Vec<DeliveryAttempt>> {
        self.get(owner_id, campaign_id).await?;
        self.deliveries
            .find(campaign_id, recipient_id)
            .await?
            .ok_or_else(|| DispatchError::not_found("Delivery", recipient_id))?;
        Ok(self.deliveries.attempts(campaign_id, recipient_id).await?)
    }

    /// Pause or stop: flip the persisted status, record the job as done,
    /// then signal the live worker
    async fn halt(
        &self,
        owner_id: Uuid,
        campaign_id: Uuid,
        action: JobAction,
    ) -> DispatchErrorResult<ControlOutcome> {
        for _ in 0..CONTROL_RETRIES {
            let status = self.get(owner_id, campaign_id).await?.status;
            let target = match status.check_action(action)? {
                ActionOutcome::NoOp => return Ok(unchanged(campaign_id, status)),
                ActionOutcome::Apply(target) => target,
            };

            if !self
                .campaigns
                .transition(campaign_id, &[status], target, None)
                .await?
            {
                continue;
            }

            let now = Utc::now();
            let mut job = Job::new(campaign_id, action);
            job.state = JobState::Done;
            job.claimed_at = Some(now);
            job.finished_at = Some(now);
            self.queue.repository().record(&job).await?;

            let signalled = self.signals.halt(campaign_id);
            log::info!(
                "Campaign {} {} -> {} (worker signalled: {})",
                campaign_id,
                status,
                target,
                signalled
            );
            self.metrics.control_applied(action);
            self.tracker.publish_status(campaign_id, None).await;
            return Ok(changed(campaign_id, target));
        }

        Err(DispatchError::conflict(format!(
            "Campaign {} changed concurrently",
            campaign_id
        )))
    }

    async fn require_sender(&self, owner_id: Uuid) -> DispatchErrorResult<()> {
        if self.senders.usable_senders(owner_id).await?.is_empty() {
            return Err(DispatchError::no_sender_available());
        }
        Ok(())
    }

    async fn current_status(&self, campaign_id: Uuid) -> DispatchErrorResult<CampaignStatus> {
        self.campaigns
            .status(campaign_id)
            .await?
            .ok_or_else(|| DispatchError::not_found("Campaign", campaign_id))
    }
}

fn changed(campaign_id: Uuid, status: CampaignStatus) -> ControlOutcome {
    ControlOutcome {
        campaign_id,
        status,
        changed: true,
    }
}

fn unchanged(campaign_id: Uuid, status: CampaignStatus) -> ControlOutcome {
    ControlOutcome {
        campaign_id,
        status,
        changed: false,
    }
}
