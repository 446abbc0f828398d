//! Simulated Clock
//!
//! Accumulates the simulated time a node has spent on I/O. Time only moves
//! when a component charges it; nothing here reads the wall clock.

use std::time::Duration;

use parking_lot::Mutex;

/// Shared, monotonic simulated-time accumulator
///
/// One clock is created per node and handed to its disk by `Arc`.
#[derive(Debug, Default)]
pub struct Clock {
    now: Mutex<Duration>,
}

impl Clock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `t`
    pub fn add_time(&self, t: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(t);
    }

    /// Total simulated time charged so far
    pub fn get_time(&self) -> Duration {
        *self.now.lock()
    }
}
