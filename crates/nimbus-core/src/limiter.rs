//! Fixed-interval request pacing.
//!
//! The Nimbus API rejects clients that issue requests too quickly, so every
//! [`Client`](crate::client::Client) paces its dispatches through a [`Pacer`]
//! injected at construction. Pacing state is shared by all clones of a
//! client, so concurrent callers are paced collectively rather than
//! per-caller.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

/// Default spacing between consecutive dispatches.
pub const DEFAULT_RATE_INTERVAL: Duration = Duration::from_millis(200);

/// Paces outbound requests.
///
/// `acquire` suspends the caller until the next dispatch slot is available.
/// Cancellation is the caller's concern: the client wraps the acquire inside
/// its request deadline, and an expired deadline abandons the wait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits until the configured interval has elapsed since the previous
    /// dispatch, then claims the slot.
    async fn acquire(&self);

    /// Replaces the pacing interval. Takes effect for subsequent acquires.
    fn set_interval(&self, interval: Duration);

    /// Currently configured pacing interval.
    fn interval(&self) -> Duration;
}

/// [`Pacer`] enforcing a minimum spacing between consecutive dispatches.
///
/// This is plain fixed-interval pacing, not a token bucket: sparse traffic
/// earns no burst allowance.
#[derive(Debug)]
pub struct IntervalPacer {
    interval: Mutex<Duration>,
    last_dispatch: AsyncMutex<Option<Instant>>,
}

impl IntervalPacer {
    /// Creates a pacer with the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: Mutex::new(interval),
            last_dispatch: AsyncMutex::new(None),
        }
    }
}

impl Default for IntervalPacer {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_INTERVAL)
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn acquire(&self) {
        let interval = self.interval();
        // Held across the sleep: concurrent callers serialize on the slot.
        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + interval).await;
        }
        *last = Some(Instant::now());
    }

    fn set_interval(&self, interval: Duration) {
        *self
            .interval
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = interval;
    }

    fn interval(&self) -> Duration {
        *self
            .interval
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
