use crate::{CampaignStatus, CoreError, RecipientFilter, Result as CoreErrorResult};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub owner_id: Uuid,

    pub name: String,
    /// Message template, personalized per recipient at send time
    pub message: String,
    pub filter: RecipientFilter,

    pub status: CampaignStatus,
    /// Snapshot size, fixed once materialized
    pub total_recipients: i64,
    pub sent_count: i64,
    pub failed_count: i64,
    pub last_error: Option<String>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Build a draft campaign, validating name and message
    #[track_caller]
    pub fn new(
        owner_id: Uuid,
        name: String,
        message: String,
        filter: RecipientFilter,
    ) -> CoreErrorResult<Self> {
        let name = name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation {
                message: format!("Campaign name must be 1-{} characters", MAX_NAME_LENGTH),
                field: Some("name".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if message.trim().is_empty() || message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(CoreError::Validation {
                message: format!("Message must be 1-{} characters", MAX_MESSAGE_LENGTH),
                field: Some("message".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            message,
            filter,
            status: CampaignStatus::Draft,
            total_recipients: 0,
            sent_count: 0,
            failed_count: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        })
    }

    pub fn pending_count(&self) -> i64 {
        (self.total_recipients - self.sent_count - self.failed_count).max(0)
    }
}
