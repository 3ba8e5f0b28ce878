use std::time::Duration;

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_MIN_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_DELAY_MS: u64 = 3000;
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WORKER_POOL_SIZE: usize = 4;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Runtime knobs of the dispatch engine
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub batch_size: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub send_timeout: Duration,
    pub worker_pool_size: usize,
    pub poll_interval: Duration,
    /// 0 disables the per-campaign quota
    pub max_sends_per_minute: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            send_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_sends_per_minute: 0,
        }
    }
}

impl DispatchSettings {
    /// Expected seconds per recipient before any pace has been observed
    pub fn mean_delay_secs(&self) -> f64 {
        (self.min_delay + self.max_delay).as_secs_f64() / 2.0
    }
}
