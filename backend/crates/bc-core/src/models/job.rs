use crate::{JobAction, JobState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A durable control action for one campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub action: JobAction,
    pub state: JobState,
    pub enqueued_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Job {
    pub fn new(campaign_id: Uuid, action: JobAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            action,
            state: JobState::Pending,
            enqueued_at: Utc::now(),
            claimed_at: None,
            finished_at: None,
            error: None,
        }
    }
}
