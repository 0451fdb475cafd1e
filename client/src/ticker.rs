//! Drift-corrected fixed-interval tick scheduling.
//!
//! Deadlines sit on a grid `origin + k * interval`. When a tick fires late
//! (slow frame, slow round-trip) the next deadline is the first grid point
//! after "now", so lateness never accumulates and missed slots are skipped
//! rather than fired in a burst.

use std::time::{Duration, Instant};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct TickScheduler {
    origin: Instant,
    interval: Duration,
    next_index: u64,
    fired: u64,
}

impl TickScheduler {
    /// The first tick is due one interval after `origin`.
    pub fn new(origin: Instant, interval: Duration) -> Self {
        Self {
            origin,
            interval: interval.max(Duration::from_millis(1)),
            next_index: 1,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Instant {
        self.deadline(self.next_index)
    }

    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }

    /// Returns `true` at most once per grid slot, when `now` has reached the
    /// pending deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline() {
            return false;
        }

        let elapsed = now.duration_since(self.origin).as_nanos();
        let slot = (elapsed / self.interval.as_nanos()) as u64;
        self.next_index = slot + 1;
        self.fired += 1;
        true
    }

    /// Re-anchors the grid, e.g. after a restart.
    pub fn reset(&mut self, origin: Instant) {
        *self = Self::new(origin, self.interval);
    }

    fn deadline(&self, index: u64) -> Instant {
        let offset = (self.interval.as_nanos() as u64).saturating_mul(index);
        self.origin + Duration::from_nanos(offset)
    }
}
