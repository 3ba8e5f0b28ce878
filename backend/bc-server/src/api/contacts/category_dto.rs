use bc_core::Category;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
        }
    }
}
