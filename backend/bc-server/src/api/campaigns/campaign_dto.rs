use bc_core::Campaign;

use serde::Serialize;

/// Campaign DTO for JSON serialization
#[derive(Debug, Serialize)]
pub struct CampaignDto {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub message: String,
    pub search: Option<String>,
    pub category_ids: Vec<String>,
    pub status: String,
    pub total_recipients: i64,
    pub sent_count: i64,
    pub failed_count: i64,
    pub pending_count: i64,
    pub last_error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

impl From<Campaign> for CampaignDto {
    fn from(c: Campaign) -> Self {
        let pending_count = c.pending_count();
        Self {
            id: c.id.to_string(),
            owner_id: c.owner_id.to_string(),
            name: c.name,
            message: c.message,
            search: c.filter.search,
            category_ids: c.filter.category_ids.iter().map(|id| id.to_string()).collect(),
            status: c.status.as_str().to_string(),
            total_recipients: c.total_recipients,
            sent_count: c.sent_count,
            failed_count: c.failed_count,
            pending_count,
            last_error: c.last_error,
            created_at: c.created_at.timestamp(),
            updated_at: c.updated_at.timestamp(),
            started_at: c.started_at.map(|t| t.timestamp()),
            completed_at: c.completed_at.map(|t| t.timestamp()),
        }
    }
}
