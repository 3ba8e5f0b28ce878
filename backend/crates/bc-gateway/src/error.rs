use bc_core::TransportError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Gateway responded {status}: {body} {location}")]
    Status {
        status: u16,
        body: String,
        location: ErrorLocation,
    },

    #[error("Gateway rejected the message: {message} {location}")]
    Rejected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown sender: {sender_id} {location}")]
    UnknownSender {
        sender_id: String,
        location: ErrorLocation,
    },

    #[error("Client build error: {message} {location}")]
    Build {
        message: String,
        location: ErrorLocation,
    },
}

impl GatewayError {
    #[track_caller]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_sender(sender_id: impl Into<String>) -> Self {
        Self::UnknownSender {
            sender_id: sender_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether another sender (or a later try) could succeed.
    ///
    /// Network failures, timeouts, 5xx, 408 and 429 are transient. Other 4xx
    /// answers and explicit rejections concern the destination or content.
    /// An unknown sender is transient so failover moves on to the next one.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::UnknownSender { .. } | Self::Build { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Rejected { .. } => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

impl From<GatewayError> for TransportError {
    fn from(error: GatewayError) -> Self {
        if error.is_transient() {
            TransportError::transient(error.to_string())
        } else {
            TransportError::permanent(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
