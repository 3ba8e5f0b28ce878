use crate::{DispatchError, Result as DispatchErrorResult};

use bc_core::{ProgressEvent, ProgressPublisher, ProgressSnapshot, RecipientOutcome};
use bc_db::{CampaignRepository, DeliveryRepository};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
struct Pace {
    total_secs: f64,
    samples: u64,
}

impl Pace {
    fn mean(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.total_secs / self.samples as f64)
    }
}

/// Computes progress snapshots and pushes them to the publisher
#[derive(Clone)]
pub struct ProgressTracker {
    campaigns: CampaignRepository,
    deliveries: DeliveryRepository,
    publisher: Arc<dyn ProgressPublisher>,
    paces: Arc<Mutex<HashMap<Uuid, Pace>>>,
    default_pace_secs: f64,
}

impl ProgressTracker {
    pub fn new(
        campaigns: CampaignRepository,
        deliveries: DeliveryRepository,
        publisher: Arc<dyn ProgressPublisher>,
        default_pace_secs: f64,
    ) -> Self {
        Self {
            campaigns,
            deliveries,
            publisher,
            paces: Arc::new(Mutex::new(HashMap::new())),
            default_pace_secs,
        }
    }

    pub async fn snapshot(&self, campaign_id: Uuid) -> DispatchErrorResult<ProgressSnapshot> {
        let campaign = self
            .campaigns
            .find_by_id(campaign_id)
            .await?
            .ok_or_else(|| DispatchError::not_found("Campaign", campaign_id))?;
        let counts = self.deliveries.counts(campaign_id).await?;

        Ok(ProgressSnapshot::compute(
            campaign_id,
            campaign.status,
            campaign.total_recipients,
            counts,
            self.pace_secs(campaign_id),
        ))
    }

    /// Observed seconds per recipient of the live worker, else the
    /// configured mean delay
    pub fn pace_secs(&self, campaign_id: Uuid) -> f64 {
        self.paces
            .lock()
            .ok()
            .and_then(|paces| paces.get(&campaign_id).and_then(Pace::mean))
            .unwrap_or(self.default_pace_secs)
    }

    pub fn record_pace(&self, campaign_id: Uuid, elapsed: Duration) {
        if let Ok(mut paces) = self.paces.lock() {
            let pace = paces.entry(campaign_id).or_default();
            pace.total_secs += elapsed.as_secs_f64();
            pace.samples += 1;
        }
    }

    pub fn forget_pace(&self, campaign_id: Uuid) {
        if let Ok(mut paces) = self.paces.lock() {
            paces.remove(&campaign_id);
        }
    }

    /// Publish a recipient's terminal outcome; returns the snapshot sent
    pub async fn publish_delivery(
        &self,
        campaign_id: Uuid,
        outcome: RecipientOutcome,
    ) -> DispatchErrorResult<ProgressSnapshot> {
        let snapshot = self.snapshot(campaign_id).await?;
        self.publisher
            .publish(campaign_id, ProgressEvent::delivery(snapshot.clone(), outcome))
            .await;
        Ok(snapshot)
    }

    /// Publish a status change. Failures are logged, never propagated.
    pub async fn publish_status(&self, campaign_id: Uuid, reason: Option<String>) {
        match self.snapshot(campaign_id).await {
            Ok(snapshot) => {
                log::debug!("Campaign {} is now {}", campaign_id, snapshot.status);
                self.publisher
                    .publish(campaign_id, ProgressEvent::status(snapshot, reason))
                    .await;
            }
            Err(e) => log::warn!("Skipping status event for {}: {}", campaign_id, e),
        }
    }
}
