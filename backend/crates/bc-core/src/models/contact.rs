use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contact as seen by the recipient resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(owner_id: Uuid, name: &str, phone: Option<&str>, email: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            phone: phone.map(String::from),
            email: email.map(String::from),
            category_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(owner_id: Uuid, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
        }
    }
}
