use crate::ContactDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactDto>,
}
