use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failure of an external collaborator (store, channel lookup)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {message} {location}")]
    Unavailable {
        collaborator: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl CollaboratorError {
    #[track_caller]
    pub fn unavailable<S: Into<String>>(collaborator: &'static str, message: S) -> Self {
        Self::Unavailable {
            collaborator,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;
