use bc_core::DeliveryRecord;

use serde::Serialize;

/// One recipient of a campaign and where its delivery stands
#[derive(Debug, Serialize)]
pub struct DeliveryDto {
    pub recipient_id: String,
    pub position: i64,
    pub name: String,
    pub destination: String,
    pub status: String,
    pub attempt_count: i64,
    pub sender_id: Option<String>,
    pub provider_message_id: Option<String>,
    pub error_message: Option<String>,
    pub sent_at: Option<i64>,
    pub failed_at: Option<i64>,
}

impl From<DeliveryRecord> for DeliveryDto {
    fn from(d: DeliveryRecord) -> Self {
        Self {
            recipient_id: d.recipient_id.to_string(),
            position: d.position,
            name: d.name,
            destination: d.destination,
            status: d.status.as_str().to_string(),
            attempt_count: d.attempt_count,
            sender_id: d.sender_id,
            provider_message_id: d.provider_message_id,
            error_message: d.error_message,
            sent_at: d.sent_at.map(|t| t.timestamp()),
            failed_at: d.failed_at.map(|t| t.timestamp()),
        }
    }
}
