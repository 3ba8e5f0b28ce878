use crate::CampaignDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignDto>,
}
