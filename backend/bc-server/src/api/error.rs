//! REST API error types
//!
//! Every failure becomes a JSON body `{"error": {"code", "message", "field"}}`
//! with a matching HTTP status.

use bc_core::{CollaboratorError, CoreError};
use bc_db::DbError;
use bc_dispatch::{DispatchError, ResolutionError};

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "NOT_FOUND", "NO_SENDER_AVAILABLE")
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// 400
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// Campaign filter could not be resolved (422)
    #[error("Recipient resolution failed: {message} {location}")]
    Resolution {
        message: String,
        location: ErrorLocation,
    },

    /// 409
    #[error("No usable sender: {message} {location}")]
    NoSenderAvailable {
        message: String,
        location: ErrorLocation,
    },

    /// Action not allowed in the campaign's current status (409)
    #[error("Invalid transition: {message} {location}")]
    InvalidTransition {
        message: String,
        location: ErrorLocation,
    },

    /// Concurrent modification (409)
    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    /// 500
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: field.map(String::from),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        let (status, code, message, field) = match self {
            ApiError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message, None)
            }
            ApiError::Validation { message, field, .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::Resolution { message, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "RESOLUTION_ERROR",
                message,
                None,
            ),
            ApiError::NoSenderAvailable { message, .. } => {
                (StatusCode::CONFLICT, "NO_SENDER_AVAILABLE", message, None)
            }
            ApiError::InvalidTransition { message, .. } => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", message, None)
            }
            ApiError::Conflict { message, .. } => (StatusCode::CONFLICT, "CONFLICT", message, None),
            ApiError::Internal { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                message,
                None,
            ),
        };

        let body = ApiErrorBody {
            code: code.into(),
            message,
            field,
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Convert UUID parse errors to API errors
impl From<uuid::Error> for ApiError {
    #[track_caller]
    fn from(e: uuid::Error) -> Self {
        ApiError::Validation {
            message: format!("Invalid UUID format: {}", e),
            field: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());

        match e {
            CoreError::Validation { message, field, .. } => ApiError::Validation {
                message,
                field,
                location,
            },
            CoreError::InvalidTransition { action, status, .. } => ApiError::InvalidTransition {
                message: format!("Cannot {} a campaign that is {}", action, status),
                location,
            },
            CoreError::Uuid { source, .. } => ApiError::Validation {
                message: format!("Invalid UUID format: {}", source),
                field: None,
                location,
            },
            other => ApiError::Internal {
                message: other.to_string(),
                location,
            },
        }
    }
}

/// Database details never reach the client
impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        log::error!("Database error: {}", e);

        let message = match e {
            DbError::Sqlx {
                source: sqlx::Error::RowNotFound,
                ..
            } => {
                return ApiError::NotFound {
                    message: "Resource not found".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                };
            }
            DbError::Migration { message, .. } => format!("Database migration error: {}", message),
            DbError::Initialization { message, .. } => {
                format!("Database initialization error: {}", message)
            }
            _ => "Database operation failed".to_string(),
        };

        ApiError::Internal {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ResolutionError> for ApiError {
    #[track_caller]
    fn from(e: ResolutionError) -> Self {
        match e {
            ResolutionError::UnknownCategory { category_id, .. } => ApiError::Resolution {
                message: format!("Unknown category: {}", category_id),
                location: ErrorLocation::from(Location::caller()),
            },
            ResolutionError::Store { source, .. } => {
                log::error!("Contact store error: {}", source);
                ApiError::Internal {
                    message: "Contact store unavailable".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    #[track_caller]
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Core { source } => source.into(),
            DispatchError::Db { source, .. } => source.into(),
            DispatchError::Resolution { source } => source.into(),
            DispatchError::NotFound { entity, id, .. } => ApiError::NotFound {
                message: format!("{} {} not found", entity, id),
                location: ErrorLocation::from(Location::caller()),
            },
            DispatchError::NoSenderAvailable { .. } => ApiError::NoSenderAvailable {
                message: "No usable sender available".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            DispatchError::Conflict { message, .. } => ApiError::Conflict {
                message,
                location: ErrorLocation::from(Location::caller()),
            },
            DispatchError::Collaborator { source, .. } => {
                log::error!("Collaborator error: {}", source);
                let message = match source {
                    CollaboratorError::Unavailable { collaborator, .. } => {
                        format!("The {} is unavailable", collaborator)
                    }
                };
                ApiError::Internal {
                    message,
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
