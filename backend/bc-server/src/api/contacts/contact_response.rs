use crate::ContactDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub contact: ContactDto,
}
