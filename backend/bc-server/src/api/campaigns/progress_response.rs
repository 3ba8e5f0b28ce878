use crate::ProgressDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: ProgressDto,
}
