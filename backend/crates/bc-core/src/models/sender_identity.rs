use serde::{Deserialize, Serialize};

/// An outbound messaging identity (one connected account/session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub id: String,
    /// Display handle, e.g. the account's phone number
    pub handle: String,
    /// Live connectivity as reported by the channel
    pub usable: bool,
}

impl SenderIdentity {
    pub fn new(id: impl Into<String>, handle: impl Into<String>, usable: bool) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            usable,
        }
    }
}
