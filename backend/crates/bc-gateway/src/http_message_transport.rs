use crate::GatewayClient;
use crate::client::chat_id;

use bc_core::{DeliveryReceipt, MessageTransport, TransportError};

use async_trait::async_trait;
use log::{debug, warn};

/// [`MessageTransport`] that posts through the sender's gateway session
pub struct HttpMessageTransport {
    client: GatewayClient,
}

impl HttpMessageTransport {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageTransport for HttpMessageTransport {
    async fn send(
        &self,
        sender_id: &str,
        destination: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, TransportError> {
        let sender = self.client.sender(sender_id)?;
        let chat = chat_id(destination);

        debug!("Sending via {} ({}) to {}", sender.id, sender.session_id, chat);

        match self.client.send_text(&sender.session_id, &chat, text).await {
            Ok(provider_message_id) => Ok(DeliveryReceipt {
                provider_message_id,
            }),
            Err(e) => {
                warn!("Send via {} to {} failed: {}", sender.id, chat, e);
                Err(e.into())
            }
        }
    }
}
