use crate::DeliveryDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeliveryListResponse {
    pub deliveries: Vec<DeliveryDto>,
}
