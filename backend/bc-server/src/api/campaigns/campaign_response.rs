use crate::CampaignDto;

use serde::Serialize;

/// Single campaign response
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: CampaignDto,
}
