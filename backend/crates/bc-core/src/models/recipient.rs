use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a campaign's recipient snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub name: String,
    /// Normalized destination address (phone number)
    pub destination: String,
}

impl Recipient {
    pub fn new(id: Uuid, name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            destination: destination.into(),
        }
    }
}
