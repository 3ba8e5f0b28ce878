use bc_core::Contact;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ContactDto {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category_ids: Vec<String>,
    pub created_at: i64,
}

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            phone: c.phone,
            email: c.email,
            category_ids: c.category_ids.iter().map(|id| id.to_string()).collect(),
            created_at: c.created_at.timestamp(),
        }
    }
}
