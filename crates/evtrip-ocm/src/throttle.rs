//! Request pacing for the POI provider.
//!
//! The provider tolerates roughly four requests per second, so outbound
//! lookups are spaced a minimum interval apart. Callers reserve the next
//! free slot under a lock, release it, then sleep until their slot comes
//! up — the lock is never held across the sleep or the request itself, and
//! concurrent planning runs sharing one client queue up in arrival order.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until this caller's reserved slot. The first caller proceeds
    /// immediately; each subsequent caller is delayed so that consecutive
    /// requests stay at least `interval` apart.
    pub async fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
