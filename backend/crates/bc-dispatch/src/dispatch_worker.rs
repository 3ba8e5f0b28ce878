//! The per-campaign delivery loop.
//!
//! A run walks the pending records of one campaign in snapshot order. Each
//! recipient gets the current failover order of usable senders; the first
//! success or permanent failure is terminal, transient failures move on to
//! the next sender. Terminal writes are conditional, so a re-run after a
//! crash never sends to a recipient twice.

use crate::{
    ControlHandle, ControlSignals, DispatchError, DispatchMetrics, DispatchSettings,
    ProgressTracker, Result as DispatchErrorResult, SendQuota, SenderPool, ShutdownCoordinator,
};

use bc_core::{
    AttemptOutcome, Campaign, CampaignStatus, DeliveryAttempt, DeliveryReceipt, DeliveryRecord,
    DeliveryStatus, Job, MessageTransport, RecipientOutcome, SenderIdentity, TransportError, render_message,
};
use bc_db::{CampaignRepository, DeliveryRepository};

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use tracing::Instrument;
use uuid::Uuid;

pub const NO_SENDER_REASON: &str = "No usable sender available";

/// How a worker run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every record is terminal; campaign finalized with this status
    Finished(CampaignStatus),
    /// Paused or stopped (by the user or an empty sender pool)
    Halted,
    /// Process shutdown; the job stays active for startup recovery
    Interrupted,
    /// The campaign was not queued when claimed
    Skipped,
}

enum RecipientResult {
    Terminal(RecipientOutcome),
    /// Record already terminal (a re-run raced an earlier write)
    AlreadyTerminal,
    NoSender,
}

#[derive(Clone)]
pub struct DispatchWorker {
    campaigns: CampaignRepository,
    deliveries: DeliveryRepository,
    senders: SenderPool,
    transport: Arc<dyn MessageTransport>,
    tracker: ProgressTracker,
    signals: ControlSignals,
    shutdown: ShutdownCoordinator,
    settings: DispatchSettings,
    metrics: DispatchMetrics,
}

impl DispatchWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        campaigns: CampaignRepository,
        deliveries: DeliveryRepository,
        senders: SenderPool,
        transport: Arc<dyn MessageTransport>,
        tracker: ProgressTracker,
        signals: ControlSignals,
        shutdown: ShutdownCoordinator,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            campaigns,
            deliveries,
            senders,
            transport,
            tracker,
            signals,
            shutdown,
            settings,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Drive a claimed start/resume job until the campaign drains or halts
    pub async fn run(&self, job: &Job) -> DispatchErrorResult<RunOutcome> {
        let span = tracing::info_span!(
            "campaign_run",
            campaign_id = %job.campaign_id,
            job_id = %job.id,
            action = job.action.as_str(),
        );

        async {
            let mut control = self.signals.register(job.campaign_id);
            self.metrics.worker_started();

            let result = self.drive(job.campaign_id, &mut control).await;

            self.metrics.worker_finished();
            self.signals.release(&control);
            self.tracker.forget_pace(job.campaign_id);
            result
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        campaign_id: Uuid,
        control: &mut ControlHandle,
    ) -> DispatchErrorResult<RunOutcome> {
        if !self.campaigns.mark_running(campaign_id).await? {
            let status = self.campaigns.status(campaign_id).await?;
            log::info!(
                "Campaign {} is {:?}, not queued; nothing to run",
                campaign_id,
                status
            );
            return Ok(RunOutcome::Skipped);
        }

        let campaign = self
            .campaigns
            .find_by_id(campaign_id)
            .await?
            .ok_or_else(|| DispatchError::not_found("Campaign", campaign_id))?;
        log::info!(
            "Running campaign {} ({} recipients, {} pending)",
            campaign_id,
            campaign.total_recipients,
            campaign.pending_count()
        );
        self.tracker.publish_status(campaign_id, None).await;

        let quota = SendQuota::per_minute(self.settings.max_sends_per_minute);

        loop {
            match self.campaigns.status(campaign_id).await? {
                Some(CampaignStatus::Running) => {}
                status => {
                    log::info!("Campaign {} halted ({:?})", campaign_id, status);
                    return Ok(RunOutcome::Halted);
                }
            }

            let batch = self
                .deliveries
                .next_pending(campaign_id, self.settings.batch_size)
                .await?;
            if batch.is_empty() {
                return self.finish(campaign_id).await;
            }

            for record in &batch {
                if control.is_halted() {
                    log::info!("Campaign {} halted by control signal", campaign_id);
                    return Ok(RunOutcome::Halted);
                }
                if self.shutdown.is_shutdown() {
                    log::info!("Campaign {} interrupted by shutdown", campaign_id);
                    return Ok(RunOutcome::Interrupted);
                }

                let started = Instant::now();

                if let Some(quota) = &quota {
                    tokio::select! {
                        _ = quota.until_ready() => {}
                        _ = control.halted() => return Ok(RunOutcome::Halted),
                        _ = self.shutdown_signal() => return Ok(RunOutcome::Interrupted),
                    }
                }

                let more_pending = match self.deliver(&campaign, record).await? {
                    RecipientResult::Terminal(outcome) => {
                        self.tracker
                            .publish_delivery(campaign_id, outcome)
                            .await?
                            .pending
                            > 0
                    }
                    RecipientResult::AlreadyTerminal => true,
                    RecipientResult::NoSender => return self.auto_pause(campaign_id).await,
                };

                if more_pending {
                    self.pause_between_recipients(control).await;
                }
                self.tracker.record_pace(campaign_id, started.elapsed());
            }
        }
    }

    /// Try each usable sender in order until the recipient is terminal
    async fn deliver(
        &self,
        campaign: &Campaign,
        record: &DeliveryRecord,
    ) -> DispatchErrorResult<RecipientResult> {
        let senders = self.senders.usable_senders(campaign.owner_id).await?;
        if senders.is_empty() {
            return Ok(RecipientResult::NoSender);
        }

        let text = render_message(&campaign.message, &record.recipient());
        let mut attempts = 0_i64;
        let mut last_failure: Option<(String, TransportError)> = None;

        for sender in &senders {
            attempts += 1;
            let result = self.send_once(sender, &record.destination, &text).await;
            let outcome = attempt_outcome(&result);

            self.deliveries
                .record_attempt(&DeliveryAttempt {
                    campaign_id: campaign.id,
                    recipient_id: record.recipient_id,
                    attempt_number: attempts,
                    sender_id: sender.id.clone(),
                    outcome,
                    error: result.as_ref().err().map(|e| e.message.clone()),
                    attempted_at: Utc::now(),
                })
                .await?;

            match result {
                Ok(receipt) => {
                    let written = self
                        .deliveries
                        .mark_sent(
                            campaign.id,
                            record.recipient_id,
                            &sender.id,
                            receipt.provider_message_id.as_deref(),
                            attempts,
                        )
                        .await?;
                    return Ok(self.terminal(
                        written,
                        record,
                        DeliveryStatus::Sent,
                        Some(sender.id.clone()),
                        attempts,
                        None,
                    ));
                }
                Err(e) if e.is_transient() => {
                    log::debug!(
                        "Transient failure for {} via {}: {}",
                        record.recipient_id,
                        sender.id,
                        e
                    );
                    self.metrics.failover();
                    last_failure = Some((sender.id.clone(), e));
                }
                Err(e) => {
                    last_failure = Some((sender.id.clone(), e));
                    break;
                }
            }
        }

        let (sender_id, error) = match last_failure {
            Some((sender_id, error)) => (Some(sender_id), error.message),
            None => (None, "All senders failed".to_string()),
        };
        log::warn!(
            "Delivery to {} failed after {} attempt(s): {}",
            record.recipient_id,
            attempts,
            error
        );

        let written = self
            .deliveries
            .mark_failed(
                campaign.id,
                record.recipient_id,
                sender_id.as_deref(),
                &error,
                attempts,
            )
            .await?;

        Ok(self.terminal(
            written,
            record,
            DeliveryStatus::Failed,
            sender_id,
            attempts,
            Some(error),
        ))
    }

    fn terminal(
        &self,
        written: bool,
        record: &DeliveryRecord,
        status: DeliveryStatus,
        sender_id: Option<String>,
        attempts: i64,
        error: Option<String>,
    ) -> RecipientResult {
        if !written {
            log::debug!(
                "Record {} was already terminal; result discarded",
                record.recipient_id
            );
            return RecipientResult::AlreadyTerminal;
        }

        self.metrics.recipient_finished(status);
        RecipientResult::Terminal(RecipientOutcome {
            recipient_id: record.recipient_id,
            status,
            sender_id,
            attempts,
            error,
        })
    }

    /// One transport call bounded by the send timeout
    async fn send_once(
        &self,
        sender: &SenderIdentity,
        destination: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, TransportError> {
        let started = Instant::now();
        let result = match tokio::time::timeout(
            self.settings.send_timeout,
            self.transport.send(&sender.id, destination, text),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::transient(format!(
                "Send timed out after {}ms",
                self.settings.send_timeout.as_millis()
            ))),
        };

        self.metrics
            .send_attempted(attempt_outcome(&result), started.elapsed());

        result
    }

    async fn auto_pause(&self, campaign_id: Uuid) -> DispatchErrorResult<RunOutcome> {
        let paused = self
            .campaigns
            .transition(
                campaign_id,
                &[CampaignStatus::Running],
                CampaignStatus::Paused,
                Some(NO_SENDER_REASON),
            )
            .await?;

        if paused {
            log::warn!("Campaign {} auto-paused: {}", campaign_id, NO_SENDER_REASON);
            self.metrics.campaign_auto_paused();
            self.tracker
                .publish_status(campaign_id, Some(NO_SENDER_REASON.to_string()))
                .await;
        }

        Ok(RunOutcome::Halted)
    }

    async fn finish(&self, campaign_id: Uuid) -> DispatchErrorResult<RunOutcome> {
        match self.campaigns.finalize(campaign_id).await? {
            Some(status) => {
                log::info!("Campaign {} finished: {}", campaign_id, status);
                self.metrics.campaign_finished(status);
                self.tracker.publish_status(campaign_id, None).await;
                Ok(RunOutcome::Finished(status))
            }
            None => Ok(RunOutcome::Halted),
        }
    }

    /// Jittered delay, cut short by a halt or shutdown
    async fn pause_between_recipients(&self, control: &mut ControlHandle) {
        let delay = jittered_delay(self.settings.min_delay, self.settings.max_delay);
        if delay.is_zero() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = control.halted() => {}
            _ = self.shutdown_signal() => {}
        }
    }

    async fn shutdown_signal(&self) {
        self.shutdown.subscribe_guard().wait().await;
    }
}

fn attempt_outcome(result: &Result<DeliveryReceipt, TransportError>) -> AttemptOutcome {
    match result {
        Ok(_) => AttemptOutcome::Sent,
        Err(e) if e.is_transient() => AttemptOutcome::Transient,
        Err(_) => AttemptOutcome::Permanent,
    }
}

/// Uniform delay in `[min, max]`
pub fn jittered_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let millis = rand::rng().random_range(min.as_millis()..=max.as_millis());
    Duration::from_millis(millis as u64)
}
