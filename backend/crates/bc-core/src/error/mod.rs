use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Invalid campaign status: {value} {location}")]
    InvalidCampaignStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid delivery status: {value} {location}")]
    InvalidDeliveryStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid attempt outcome: {value} {location}")]
    InvalidAttemptOutcome {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid job action: {value} {location}")]
    InvalidJobAction {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid job state: {value} {location}")]
    InvalidJobState {
        value: String,
        location: ErrorLocation,
    },

    #[error("Cannot {action} a campaign that is {status} {location}")]
    InvalidTransition {
        action: String,
        status: String,
        location: ErrorLocation,
    },

    #[error("UUID parse error: {source} {location}")]
    Uuid {
        source: uuid::Error,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
