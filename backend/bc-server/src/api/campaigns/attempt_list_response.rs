use crate::AttemptDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AttemptListResponse {
    pub attempts: Vec<AttemptDto>,
}
