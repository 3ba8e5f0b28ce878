use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_CHANNEL_CAPACITY: usize = 16;
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Real-time progress fan-out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Per-campaign broadcast buffer; slow subscribers lag past this
    pub channel_capacity: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PublisherConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.channel_capacity < MIN_CHANNEL_CAPACITY
            || self.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "publisher.channel_capacity must be {}-{}, got {}",
                MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY, self.channel_capacity
            )));
        }

        Ok(())
    }
}
