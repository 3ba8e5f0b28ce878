use crate::CategoryDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryDto>,
}
