use crate::{CollaboratorResult, SenderIdentity};

use async_trait::async_trait;
use uuid::Uuid;

/// Live view of the sender identities a user can dispatch through
#[async_trait]
pub trait SenderSource: Send + Sync {
    async fn senders(&self, owner_id: Uuid) -> CollaboratorResult<Vec<SenderIdentity>>;
}
