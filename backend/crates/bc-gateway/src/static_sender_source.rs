use bc_core::{CollaboratorResult, SenderIdentity, SenderSource};

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

/// Fixed sender list whose usability can be flipped at runtime
#[derive(Clone, Default)]
pub struct StaticSenderSource {
    senders: Arc<RwLock<Vec<SenderIdentity>>>,
}

impl StaticSenderSource {
    pub fn new(senders: Vec<SenderIdentity>) -> Self {
        Self {
            senders: Arc::new(RwLock::new(senders)),
        }
    }

    /// Mark one sender usable or not; unknown ids are ignored
    pub fn set_usable(&self, sender_id: &str, usable: bool) {
        if let Ok(mut senders) = self.senders.write() {
            for sender in senders.iter_mut().filter(|s| s.id == sender_id) {
                sender.usable = usable;
            }
        }
    }
}

#[async_trait]
impl SenderSource for StaticSenderSource {
    async fn senders(&self, _owner_id: Uuid) -> CollaboratorResult<Vec<SenderIdentity>> {
        Ok(self
            .senders
            .read()
            .map(|senders| senders.clone())
            .unwrap_or_default())
    }
}
