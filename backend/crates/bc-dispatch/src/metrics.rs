use bc_core::{AttemptOutcome, CampaignStatus, DeliveryStatus, JobAction};

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for campaign dispatch
#[derive(Clone)]
pub struct DispatchMetrics {
    prefix: &'static str,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self {
            prefix: "bc_dispatch",
        }
    }

    /// One transport call finished
    pub fn send_attempted(&self, outcome: AttemptOutcome, latency: Duration) {
        counter!(format!("{}.sends.total", self.prefix)).increment(1);
        counter!(format!("{}.sends.{}", self.prefix, outcome.as_str())).increment(1);
        histogram!(format!("{}.sends.latency_ms", self.prefix))
            .record(latency.as_millis() as f64);
    }

    /// A transient failure moved a recipient to the next sender
    pub fn failover(&self) {
        counter!(format!("{}.sends.failover", self.prefix)).increment(1);
    }

    pub fn recipient_finished(&self, status: DeliveryStatus) {
        counter!(format!("{}.recipients.{}", self.prefix, status.as_str())).increment(1);
    }

    pub fn campaign_finished(&self, status: CampaignStatus) {
        counter!(format!("{}.campaigns.{}", self.prefix, status.as_str())).increment(1);
    }

    pub fn campaign_auto_paused(&self) {
        counter!(format!("{}.campaigns.auto_paused", self.prefix)).increment(1);
    }

    pub fn control_applied(&self, action: JobAction) {
        counter!(format!("{}.control.{}", self.prefix, action.as_str())).increment(1);
    }

    pub fn job_claimed(&self) {
        counter!(format!("{}.jobs.claimed", self.prefix)).increment(1);
    }

    pub fn job_failed(&self) {
        counter!(format!("{}.jobs.failed", self.prefix)).increment(1);
    }

    pub fn worker_started(&self) {
        gauge!(format!("{}.workers.active", self.prefix)).increment(1.0);
    }

    pub fn worker_finished(&self) {
        gauge!(format!("{}.workers.active", self.prefix)).decrement(1.0);
    }

    pub fn broadcast_published(&self, message_type: &str, receivers: usize) {
        counter!(format!("{}.broadcast.{}", self.prefix, message_type)).increment(1);
        gauge!(format!("{}.broadcast.receivers", self.prefix)).set(receivers as f64);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
