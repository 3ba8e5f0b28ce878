use crate::{ConfigError, ConfigErrorResult};

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// One outbound identity served by the messaging gateway
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SenderConfig {
    pub id: String,
    /// Display handle, usually the account's phone number
    #[serde(default)]
    pub handle: String,
    /// Gateway session backing this identity
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub senders: Vec<SenderConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            senders: Vec::new(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::gateway(format!(
                "gateway.base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS
            || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::gateway(format!(
                "gateway.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        let mut ids = HashSet::new();
        for sender in &self.senders {
            if sender.id.trim().is_empty() || sender.session_id.trim().is_empty() {
                return Err(ConfigError::gateway(
                    "gateway.senders entries need a non-empty id and session_id",
                ));
            }
            if !ids.insert(sender.id.as_str()) {
                return Err(ConfigError::gateway(format!(
                    "gateway.senders has duplicate id '{}'",
                    sender.id
                )));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
