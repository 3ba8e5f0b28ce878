use crate::{DeliveryStatus, Recipient};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub campaign_id: Uuid,
    pub recipient_id: Uuid,
    /// Snapshot order, starting at 0
    pub position: i64,

    pub name: String,
    pub destination: String,

    pub status: DeliveryStatus,
    pub attempt_count: i64,
    pub sender_id: Option<String>,
    pub provider_message_id: Option<String>,
    pub error_message: Option<String>,

    pub sent_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl DeliveryRecord {
    pub fn recipient(&self) -> Recipient {
        Recipient::new(self.recipient_id, self.name.clone(), self.destination.clone())
    }
}
