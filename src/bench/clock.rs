//! Time sources for the sampler.

use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// `now` returns the time elapsed since the clock's own epoch. Only
/// differences between readings are meaningful.
pub trait Clock {
    /// Current reading of the clock.
    fn now(&mut self) -> Duration;
}

/// The system's monotonic high-resolution clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose epoch is the current instant.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&mut self) -> Duration {
        self.epoch.elapsed()
    }
}

/// A deterministic clock that advances by a fixed step on every reading.
///
/// Useful for simulations and for testing code that consumes a [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SteppingClock {
    current: Duration,
    step: Duration,
}

impl SteppingClock {
    /// Creates a clock starting at zero that advances by `step` per reading.
    pub const fn new(step: Duration) -> Self {
        Self {
            current: Duration::ZERO,
            step,
        }
    }

    /// Changes the amount added after each reading.
    pub const fn set_step(&mut self, step: Duration) {
        self.step = step;
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> Duration {
        let reading = self.current;
        self.current += self.step;
        reading
    }
}
