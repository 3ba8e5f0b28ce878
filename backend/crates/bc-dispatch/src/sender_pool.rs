use crate::Result as DispatchErrorResult;

use bc_core::{SenderIdentity, SenderSource};

use std::sync::Arc;

use uuid::Uuid;

/// Live view of the sender identities a campaign may use
#[derive(Clone)]
pub struct SenderPool {
    source: Arc<dyn SenderSource>,
}

impl SenderPool {
    pub fn new(source: Arc<dyn SenderSource>) -> Self {
        Self { source }
    }

    /// Failover order for the next recipient
    pub async fn usable_senders(
        &self,
        owner_id: Uuid,
    ) -> DispatchErrorResult<Vec<SenderIdentity>> {
        let identities = self.source.senders(owner_id).await?;
        Ok(failover_order(identities))
    }
}

/// Usable identities only, sorted by id, first of each id kept
pub fn failover_order(mut identities: Vec<SenderIdentity>) -> Vec<SenderIdentity> {
    identities.retain(|s| s.usable);
    identities.sort_by(|a, b| a.id.cmp(&b.id));
    identities.dedup_by(|a, b| a.id == b.id);
    identities
}
