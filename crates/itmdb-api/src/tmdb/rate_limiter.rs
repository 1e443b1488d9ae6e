//! Request pacing for the TMDb API.

use std::time::{Duration, Instant};

/// Default spacing between requests (TMDb tolerates ~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Keeps consecutive requests at least `min_interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_allowed: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Sleeps until a request may start, then reserves the next slot.
    pub async fn wait(&mut self) {
        if let Some(next) = self.next_allowed {
            let now = Instant::now();
            if next > now {
                tokio::time::sleep(next.duration_since(now)).await;
            }
        }
        self.next_allowed = Instant::now().checked_add(self.min_interval);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
