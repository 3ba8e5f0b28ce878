use serde::Deserialize;

pub const DEFAULT_DELIVERY_LIMIT: i64 = 100;
pub const MAX_DELIVERY_LIMIT: i64 = 1000;

/// Query parameters for listing a campaign's deliveries
#[derive(Debug, Deserialize)]
pub struct ListDeliveriesQuery {
    /// pending, sent or failed
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
