use crate::GatewayClient;

use bc_core::{CollaboratorResult, SenderIdentity, SenderSource};

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;
use uuid::Uuid;

/// [`SenderSource`] that asks the gateway for each session's live state.
///
/// A session is usable only while it reports `CONNECTED`; lookup failures
/// make the sender unusable rather than failing the whole pool.
pub struct HttpSenderSource {
    client: GatewayClient,
}

impl HttpSenderSource {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SenderSource for HttpSenderSource {
    async fn senders(&self, _owner_id: Uuid) -> CollaboratorResult<Vec<SenderIdentity>> {
        let checks = self.client.senders().iter().map(|sender| async move {
            let usable = match self.client.is_connected(&sender.session_id).await {
                Ok(connected) => connected,
                Err(e) => {
                    warn!("Session status for sender {} unavailable: {}", sender.id, e);
                    false
                }
            };
            SenderIdentity::new(sender.id.clone(), sender.handle.clone(), usable)
        });

        Ok(join_all(checks).await)
    }
}
