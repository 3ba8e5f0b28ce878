use bc_core::ProgressSnapshot;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProgressDto {
    pub campaign_id: String,
    pub status: String,
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub pending: i64,
    pub percentage: f64,
    pub eta_seconds: u64,
}

impl From<ProgressSnapshot> for ProgressDto {
    fn from(s: ProgressSnapshot) -> Self {
        Self {
            campaign_id: s.campaign_id.to_string(),
            status: s.status.as_str().to_string(),
            total: s.total,
            sent: s.sent,
            failed: s.failed,
            pending: s.pending,
            percentage: s.percentage,
            eta_seconds: s.eta_seconds,
        }
    }
}
