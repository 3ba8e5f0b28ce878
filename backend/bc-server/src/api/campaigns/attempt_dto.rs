use bc_core::DeliveryAttempt;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AttemptDto {
    pub attempt_number: i64,
    pub sender_id: String,
    pub outcome: String,
    pub error: Option<String>,
    pub attempted_at: i64,
}

impl From<DeliveryAttempt> for AttemptDto {
    fn from(a: DeliveryAttempt) -> Self {
        Self {
            attempt_number: a.attempt_number,
            sender_id: a.sender_id,
            outcome: a.outcome.as_str().to_string(),
            error: a.error,
            attempted_at: a.attempted_at.timestamp(),
        }
    }
}
