//! Politeness throttle for one site crawl
//!
//! The throttle spaces fetch starts by the site's crawl delay. The delay is
//! measured from the later of the previous fetch start and the previous fetch
//! completion, so with a single worker it is exactly "delay since the last
//! fetch finished", and with several workers it is still a site-wide minimum
//! spacing between starts rather than a per-worker one.

use std::time::Duration;
use tokio::time::Instant;

/// Longest spacing a throttle will enforce
pub const MAX_DELAY: Duration = Duration::from_secs(86_400);

/// Site-wide inter-fetch spacing
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_start: Option<Instant>,
    last_finish: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle enforcing `delay` between fetches
    ///
    /// Delays above [`MAX_DELAY`] are clamped to it.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.min(MAX_DELAY),
            last_start: None,
            last_finish: None,
        }
    }

    /// A throttle that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured spacing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The earliest instant the next fetch may start
    ///
    /// # Returns
    ///
    /// * `Some(Instant)` - A delay applies and a fetch has already happened
    /// * `None` - The next fetch may start immediately
    pub fn ready_at(&self) -> Option<Instant> {
        if self.delay.is_zero() {
            return None;
        }

        let anchor = match (self.last_start, self.last_finish) {
            (Some(start), Some(finish)) => start.max(finish),
            (Some(at), None) | (None, Some(at)) => at,
            (None, None) => return None,
        };

        Some(anchor.checked_add(self.delay).unwrap_or(anchor + MAX_DELAY))
    }

    /// Sleeps until the next fetch may start
    pub async fn wait(&self) {
        if let Some(at) = self.ready_at() {
            if at > Instant::now() {
                tracing::trace!("Throttling for {:?}", at - Instant::now());
            }
            tokio::time::sleep_until(at).await;
        }
    }

    /// Records that a fetch started at `now`
    pub fn record_start(&mut self, now: Instant) {
        self.last_start = Some(now);
    }

    /// Records that a fetch finished at `now`
    pub fn record_finish(&mut self, now: Instant) {
        self.last_finish = Some(now);
    }
}
