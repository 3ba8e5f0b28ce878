//! Caller identity for the REST and WebSocket routes

use crate::{ApiError, AppState};

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extracts the owner on whose behalf the request runs
///
/// Reads the `X-User-Id` header; a missing or malformed header falls back to
/// the configured default user.
pub struct UserId(pub Uuid);

impl FromRequestParts<AppState> for UserId {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            if let Some(header_value) = parts.headers.get(USER_ID_HEADER)
                && let Ok(user_id_str) = header_value.to_str()
            {
                if let Ok(uuid) = Uuid::parse_str(user_id_str.trim()) {
                    log::debug!("Using user ID from {} header: {}", USER_ID_HEADER, uuid);
                    return Ok(UserId(uuid));
                }
                log::warn!("Invalid UUID in {} header: {}", USER_ID_HEADER, user_id_str);
            }

            log::debug!("Using default user ID: {}", state.default_user_id);
            Ok(UserId(state.default_user_id))
        }
    }
}
