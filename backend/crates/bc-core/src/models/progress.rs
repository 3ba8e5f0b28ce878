use crate::{CampaignStatus, DeliveryStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate delivery counts of one campaign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub sent: i64,
    pub failed: i64,
    pub pending: i64,
}

impl DeliveryCounts {
    pub fn processed(&self) -> i64 {
        self.sent + self.failed
    }

    pub fn total(&self) -> i64 {
        self.sent + self.failed + self.pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub campaign_id: Uuid,
    pub status: CampaignStatus,
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub pending: i64,
    /// 0.0 - 100.0
    pub percentage: f64,
    pub eta_seconds: u64,
}

impl ProgressSnapshot {
    /// Build a snapshot from counts.
    ///
    /// `seconds_per_recipient` is the expected wall time for one more
    /// recipient; negative or non-finite values are treated as zero.
    pub fn compute(
        campaign_id: Uuid,
        status: CampaignStatus,
        total: i64,
        counts: DeliveryCounts,
        seconds_per_recipient: f64,
    ) -> Self {
        let total = total.max(0);
        let percentage = if total == 0 {
            100.0
        } else {
            (counts.processed() as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        let pace = if seconds_per_recipient.is_finite() {
            seconds_per_recipient.max(0.0)
        } else {
            0.0
        };
        let eta_seconds = if status.halts_dispatch() {
            0
        } else {
            (counts.pending.max(0) as f64 * pace).ceil() as u64
        };

        Self {
            campaign_id,
            status,
            total,
            sent: counts.sent,
            failed: counts.failed,
            pending: counts.pending,
            percentage,
            eta_seconds,
        }
    }
}

/// Outcome of a single recipient, attached to progress events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientOutcome {
    pub recipient_id: Uuid,
    pub status: DeliveryStatus,
    pub sender_id: Option<String>,
    pub attempts: i64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventKind {
    /// A delivery record reached a terminal state
    Delivery,
    /// The campaign changed status
    Status,
}

/// Event pushed to real-time subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub kind: ProgressEventKind,
    pub snapshot: ProgressSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub emitted_at: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn delivery(snapshot: ProgressSnapshot, outcome: RecipientOutcome) -> Self {
        Self {
            kind: ProgressEventKind::Delivery,
            snapshot,
            recipient: Some(outcome),
            reason: None,
            emitted_at: Utc::now(),
        }
    }

    pub fn status(snapshot: ProgressSnapshot, reason: Option<String>) -> Self {
        Self {
            kind: ProgressEventKind::Status,
            snapshot,
            recipient: None,
            reason,
            emitted_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self.kind {
            ProgressEventKind::Delivery => "delivery",
            ProgressEventKind::Status => "status",
        }
    }
}
