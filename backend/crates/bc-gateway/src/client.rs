use crate::{GatewayError, Result as GatewayResult};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use log::debug;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use serde_json::Value;

pub const CONNECTED_STATE: &str = "CONNECTED";

/// A sender identity and the gateway session that backs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySender {
    pub id: String,
    pub handle: String,
    pub session_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    content_type: &'static str,
    content: &'a str,
}

/// Thin client over the gateway's session and message endpoints
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    senders: Vec<GatewaySender>,
    client: ReqwestClient,
}

impl GatewayClient {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        senders: Vec<GatewaySender>,
    ) -> GatewayResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Build {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            senders,
            client,
        })
    }

    pub fn senders(&self) -> &[GatewaySender] {
        &self.senders
    }

    pub fn sender(&self, sender_id: &str) -> GatewayResult<&GatewaySender> {
        self.senders
            .iter()
            .find(|s| s.id == sender_id)
            .ok_or_else(|| GatewayError::unknown_sender(sender_id))
    }

    /// Raw `state` string of a session, e.g. "CONNECTED"
    pub async fn session_state(&self, session_id: &str) -> GatewayResult<Option<String>> {
        let url = format!("{}/session/status/{}", self.base_url, session_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::status(status.as_u16(), body));
        }

        let body: Value = response.json().await?;
        debug!("Session {} status: {}", session_id, body);

        Ok(body
            .get("state")
            .and_then(Value::as_str)
            .map(String::from))
    }

    pub async fn is_connected(&self, session_id: &str) -> GatewayResult<bool> {
        Ok(self.session_state(session_id).await?.as_deref() == Some(CONNECTED_STATE))
    }

    /// Send a text message; returns the provider message id when reported
    pub async fn send_text(
        &self,
        session_id: &str,
        chat_id: &str,
        text: &str,
    ) -> GatewayResult<Option<String>> {
        let url = format!("{}/client/sendMessage/{}", self.base_url, session_id);
        let body = SendMessageBody {
            chat_id,
            content_type: "string",
            content: text,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::status(status.as_u16(), body));
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("gateway reported success=false");
            return Err(GatewayError::rejected(message));
        }

        Ok(provider_message_id(&body))
    }
}

/// `message.id._serialized`, `message.id` or `id`, whichever is present
fn provider_message_id(body: &Value) -> Option<String> {
    let message_id = body.get("message").and_then(|m| m.get("id"));

    message_id
        .and_then(|id| id.get("_serialized"))
        .or(message_id)
        .or_else(|| body.get("id"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Gateway chat id for a normalized phone number
pub(crate) fn chat_id(destination: &str) -> String {
    if destination.contains('@') {
        return destination.to_string();
    }

    let digits: String = destination.chars().filter(char::is_ascii_digit).collect();
    format!("{}@c.us", digits)
}
