use bc_dispatch::ControlOutcome;

use serde::Serialize;

/// Result of start/pause/resume/stop
#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub campaign_id: String,
    pub status: String,
    /// `false` when the action was an idempotent no-op
    pub changed: bool,
}

impl From<ControlOutcome> for ControlResponse {
    fn from(o: ControlOutcome) -> Self {
        Self {
            campaign_id: o.campaign_id.to_string(),
            status: o.status.as_str().to_string(),
            changed: o.changed,
        }
    }
}
