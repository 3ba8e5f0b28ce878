//! Adapters for an HTTP messaging gateway that exposes one session per
//! connected account:
//!
//! - `GET  {base}/session/status/{session}` -> `{"state": "CONNECTED", ...}`
//! - `POST {base}/client/sendMessage/{session}` with
//!   `{"chatId", "contentType": "string", "content"}`

mod client;
mod error;
mod http_message_transport;
mod http_sender_source;
mod static_sender_source;

pub use client::{GatewayClient, GatewaySender};
pub use error::{GatewayError, Result};
pub use http_message_transport::HttpMessageTransport;
pub use http_sender_source::HttpSenderSource;
pub use static_sender_source::StaticSenderSource;
