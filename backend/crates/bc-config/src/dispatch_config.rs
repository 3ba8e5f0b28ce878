use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Dispatch constraints
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 500;
pub const DEFAULT_BATCH_SIZE: usize = 10;

pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 3000;

pub const MIN_SEND_TIMEOUT_SECS: u64 = 1;
pub const MAX_SEND_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;

pub const MIN_WORKER_POOL_SIZE: usize = 1;
pub const MAX_WORKER_POOL_SIZE: usize = 64;
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

pub const MIN_POLL_INTERVAL_MS: u64 = 50;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

pub const MAX_SENDS_PER_MINUTE: u32 = 600;
/// 0 disables the quota
pub const DEFAULT_SENDS_PER_MINUTE: u32 = 0;

/// Worker loop pacing and concurrency.
///
/// Every campaign waits a uniformly random delay in
/// `[min_delay_ms, max_delay_ms]` between two recipients. When
/// `max_sends_per_minute` is non-zero a per-campaign quota is applied on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Pending records fetched per batch; status is re-read between batches
    pub batch_size: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Upper bound of a single transport call
    pub send_timeout_secs: u64,
    /// Campaigns dispatched concurrently
    pub worker_pool_size: usize,
    /// Job queue poll fallback when no wake-up arrives
    pub poll_interval_ms: u64,
    pub max_sends_per_minute: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            send_timeout_secs: DEFAULT_SEND_TIMEOUT_SECS,
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_sends_per_minute: DEFAULT_SENDS_PER_MINUTE,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::dispatch(format!(
                "dispatch.batch_size must be {}-{}, got {}",
                MIN_BATCH_SIZE, MAX_BATCH_SIZE, self.batch_size
            )));
        }

        if self.max_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::dispatch(format!(
                "dispatch.max_delay_ms must be <= {}, got {}",
                MAX_DELAY_MS, self.max_delay_ms
            )));
        }

        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::dispatch(format!(
                "dispatch.min_delay_ms ({}) must not exceed dispatch.max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }

        if self.send_timeout_secs < MIN_SEND_TIMEOUT_SECS
            || self.send_timeout_secs > MAX_SEND_TIMEOUT_SECS
        {
            return Err(ConfigError::dispatch(format!(
                "dispatch.send_timeout_secs must be {}-{}, got {}",
                MIN_SEND_TIMEOUT_SECS, MAX_SEND_TIMEOUT_SECS, self.send_timeout_secs
            )));
        }

        if self.worker_pool_size < MIN_WORKER_POOL_SIZE
            || self.worker_pool_size > MAX_WORKER_POOL_SIZE
        {
            return Err(ConfigError::dispatch(format!(
                "dispatch.worker_pool_size must be {}-{}, got {}",
                MIN_WORKER_POOL_SIZE, MAX_WORKER_POOL_SIZE, self.worker_pool_size
            )));
        }

        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS
            || self.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::dispatch(format!(
                "dispatch.poll_interval_ms must be {}-{}, got {}",
                MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, self.poll_interval_ms
            )));
        }

        if self.max_sends_per_minute > MAX_SENDS_PER_MINUTE {
            return Err(ConfigError::dispatch(format!(
                "dispatch.max_sends_per_minute must be 0-{}, got {}",
                MAX_SENDS_PER_MINUTE, self.max_sends_per_minute
            )));
        }

        Ok(())
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Mean inter-recipient delay, used for ETA before any pace is observed
    pub fn mean_delay_secs(&self) -> f64 {
        (self.min_delay_ms + self.max_delay_ms) as f64 / 2.0 / 1000.0
    }
}
