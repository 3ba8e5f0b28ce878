use std::num::NonZeroU32;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Per-campaign cap on transport sends
pub struct SendQuota {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl SendQuota {
    /// `None` when `max_sends_per_minute` is 0 (disabled)
    pub fn per_minute(max_sends_per_minute: u32) -> Option<Self> {
        let limit = NonZeroU32::new(max_sends_per_minute)?;
        Some(Self {
            limiter: RateLimiter::direct(Quota::per_minute(limit).allow_burst(
                NonZeroU32::MIN,
            )),
        })
    }

    /// Wait until one more send fits the quota
    pub async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }

    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
