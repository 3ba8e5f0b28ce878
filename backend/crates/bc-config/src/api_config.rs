use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;
use uuid::Uuid;

pub const DEFAULT_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// User id assumed when a request carries no X-User-Id header
    pub default_user_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_user_id: String::from(DEFAULT_USER_ID),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.default_user().map(|_| ())
    }

    pub fn default_user(&self) -> ConfigErrorResult<Uuid> {
        Uuid::parse_str(&self.default_user_id).map_err(|e| {
            ConfigError::api(format!(
                "api.default_user_id must be a UUID, got '{}': {}",
                self.default_user_id, e
            ))
        })
    }
}
