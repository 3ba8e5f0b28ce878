use bc_core::ProgressEvent;

use bytes::Bytes;

/// A progress event serialized once and shared by every subscriber
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// JSON text frame, ready to send on the wire
    pub payload: Bytes,
    /// `delivery` or `status`, for metrics and logging
    pub message_type: &'static str,
}

impl BroadcastMessage {
    pub fn new(payload: Bytes, message_type: &'static str) -> Self {
        Self {
            payload,
            message_type,
        }
    }

    pub fn from_event(event: &ProgressEvent) -> serde_json::Result<Self> {
        let payload = serde_json::to_vec(event)?;
        Ok(Self::new(Bytes::from(payload), event.event_type()))
    }

    /// Payload as UTF-8 text
    pub fn as_text(&self) -> &str {
        std::str::from_utf8(&self.payload).unwrap_or_default()
    }
}
