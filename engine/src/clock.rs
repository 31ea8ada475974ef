use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Accumulator-based step timer.
///
/// Hosts feed it elapsed frame time; it answers how many whole simulation
/// steps are due, keeping the remainder. This decouples the simulation rate
/// (e.g. a level-scaled gravity interval) from the render cadence, and lets
/// tests drive time with synthetic durations instead of a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTimer {
    #[serde(with = "crate::serde_duration")]
    elapsed: Duration,
    #[serde(with = "crate::serde_duration")]
    interval: Duration,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changing the interval keeps accumulated progress; a shorter interval
    /// may therefore yield a step sooner on the next `advance`.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Accumulate `dt` and return the number of whole steps now due.
    /// A zero interval yields no steps (and discards the accumulation).
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            self.elapsed = Duration::ZERO;
            return 0;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        let mut steps = 0u32;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            steps = steps.saturating_add(1);
        }
        steps
    }
}
