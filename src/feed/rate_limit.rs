//! Per-client rate limiting for feed reads.

use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::debug;

/// Keyed limiter; each client identity gets its own quota bucket.
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl ClientRateLimiter {
    /// Allow `per_minute` requests per client per minute.
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::new(1).expect("1 is non-zero")),
        );
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Whether `client_id` may make a request right now.
    pub fn check(&self, client_id: &str) -> bool {
        let allowed = self.limiter.check_key(&client_id.to_string()).is_ok();
        if !allowed {
            debug!("rate limited client {}", client_id);
        }
        allowed
    }
}
