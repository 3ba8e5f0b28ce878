use crate::ResolutionError;

use bc_core::{CollaboratorError, CoreError};
use bc_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Core {
        #[from]
        source: CoreError,
    },

    #[error("Database error: {source} {location}")]
    Db {
        source: DbError,
        location: ErrorLocation,
    },

    /// The filter itself is unusable; store outages become `Collaborator`
    #[error("Recipient resolution failed: {source}")]
    Resolution { source: ResolutionError },

    #[error("Collaborator error: {source} {location}")]
    Collaborator {
        source: CollaboratorError,
        location: ErrorLocation,
    },

    #[error("{entity} not found: {id} {location}")]
    NotFound {
        entity: &'static str,
        id: Uuid,
        location: ErrorLocation,
    },

    #[error("No usable sender available {location}")]
    NoSenderAvailable { location: ErrorLocation },

    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },
}

impl DispatchError {
    #[track_caller]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_sender_available() -> Self {
        Self::NoSenderAvailable {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for DispatchError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Db {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ResolutionError> for DispatchError {
    fn from(source: ResolutionError) -> Self {
        match source {
            ResolutionError::Store { source, location } => Self::Collaborator { source, location },
            other => Self::Resolution { source: other },
        }
    }
}

impl From<CollaboratorError> for DispatchError {
    #[track_caller]
    fn from(source: CollaboratorError) -> Self {
        Self::Collaborator {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
