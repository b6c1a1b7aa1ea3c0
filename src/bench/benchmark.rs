//! Fixed-capacity lap sampler.
//!
//! A [`Benchmark`] brackets whatever the caller runs between two calls to
//! [`Benchmark::advance`]. Storage for every lap is allocated up front so the
//! measurement loop never reallocates.
//!
//! ```rust
//! use lap_samples::Benchmark;
//!
//! let mut bench = Benchmark::new(1024).unwrap();
//! while bench.advance() {
//!     std::hint::black_box((0..64).sum::<u64>());
//! }
//! assert_eq!(bench.laps().len(), 1024);
//! println!("{}", bench.histogram(10).unwrap());
//! ```

use std::hint::black_box;
use std::time::Duration;

use tracing::debug;

use super::clock::{Clock, MonotonicClock};
use super::histogram::{Histogram, HistogramOptions};
use crate::operations::statistics::durations_to_seconds;
use crate::{LapError, LapResult};

/// A single-threaded benchmark run with a fixed number of laps.
///
/// Not safe to drive from several threads; use
/// [`Stopwatch`](super::stopwatch::Stopwatch) for that.
#[derive(Debug, Clone)]
pub struct Benchmark<C: Clock = MonotonicClock> {
    laps: Vec<Duration>,
    capacity: usize,
    start: Option<Duration>,
    clock: C,
}

impl Benchmark {
    /// Creates a run that records `capacity` laps with the system clock.
    pub fn new(capacity: usize) -> LapResult<Self> {
        Self::with_clock(capacity, MonotonicClock::new())
    }

    /// Creates a run of `capacity` laps and drives it with `f` until closed.
    pub fn run<T>(capacity: usize, f: impl FnMut() -> T) -> LapResult<Self> {
        let mut bench = Self::new(capacity)?;
        bench.measure(f);
        Ok(bench)
    }
}

impl<C: Clock> Benchmark<C> {
    /// Creates a run that records `capacity` laps read from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> LapResult<Self> {
        if capacity == 0 {
            return Err(LapError::invalid_config("capacity", "must be > 0"));
        }
        Ok(Self {
            laps: Vec::with_capacity(capacity),
            capacity,
            start: None,
            clock,
        })
    }

    /// Closes the current lap and opens the next one.
    ///
    /// The first call only marks the start of the first lap. Each later call
    /// records the time since the previous call. Returns `false` once
    /// `capacity` laps have been recorded; from then on nothing is written.
    #[inline]
    pub fn advance(&mut self) -> bool {
        if self.laps.len() >= self.capacity {
            return false;
        }

        let now = self.clock.now();
        let Some(start) = self.start else {
            self.start = Some(now);
            return true;
        };

        self.laps.push(now.saturating_sub(start));
        if self.laps.len() < self.capacity {
            self.start = Some(now);
            true
        } else {
            self.start = None;
            debug!(laps = self.laps.len(), capacity = self.capacity, "benchmark run closed");
            false
        }
    }

    /// Drives the run with `f` until it is closed.
    pub fn measure<T>(&mut self, mut f: impl FnMut() -> T) {
        while self.advance() {
            black_box(f());
        }
    }

    /// The recorded laps in the order they were taken.
    ///
    /// Before the run is closed this is the partial sequence so far.
    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    /// The recorded laps in seconds.
    pub fn seconds(&self) -> Vec<f64> {
        durations_to_seconds(&self.laps)
    }

    /// Number of laps the run records.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of laps recorded so far.
    pub fn len(&self) -> usize {
        self.laps.len()
    }

    /// Returns true if no lap has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    /// Returns true once every lap has been recorded.
    pub fn is_finished(&self) -> bool {
        self.laps.len() == self.capacity
    }

    /// Histogram of the recorded laps with `bin_count` buckets.
    pub fn histogram(&self, bin_count: usize) -> LapResult<Histogram> {
        self.histogram_with(HistogramOptions::new(bin_count))
    }

    /// Histogram of the recorded laps with custom options.
    pub fn histogram_with(&self, options: HistogramOptions) -> LapResult<Histogram> {
        Histogram::from_durations(&self.laps, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::clock::SteppingClock;

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = Benchmark::new(0);
        assert!(matches!(result, Err(LapError::Configuration { .. })));
    }

    #[test]
    fn test_capacity_plus_one_calls() {
        for capacity in [1, 2, 3, 10, 100] {
            let mut bench = Benchmark::new(capacity).unwrap();
            for _ in 0..capacity {
                assert!(bench.advance());
            }
            assert!(!bench.advance());
            assert_eq!(bench.laps().len(), capacity);
            assert!(bench.is_finished());

            // Closed runs stay closed and never grow
            assert!(!bench.advance());
            assert_eq!(bench.len(), capacity);
        }
    }

    #[test]
    fn test_storage_is_never_reallocated() {
        let mut bench = Benchmark::new(256).unwrap();
        let before = bench.laps.as_ptr();
        while bench.advance() {}
        assert_eq!(bench.laps.as_ptr(), before);
        assert_eq!(bench.laps.capacity(), 256);
    }

    #[test]
    fn test_fixed_delay_laps() {
        let clock = SteppingClock::new(Duration::from_nanos(5000));
        let mut bench = Benchmark::with_clock(10, clock).unwrap();
        let mut iterations = 0;
        while bench.advance() {
            iterations += 1;
        }
        assert_eq!(iterations, 10);
        assert!(bench.laps().iter().all(|&lap| lap == Duration::from_nanos(5000)));

        let histogram = bench.histogram(10).unwrap();
        assert_eq!(histogram.counts()[0], 10);
        assert_eq!(histogram.total(), 10);
    }

    #[test]
    fn test_partial_laps_and_seconds() {
        let clock = SteppingClock::new(Duration::from_millis(2));
        let mut bench = Benchmark::with_clock(5, clock).unwrap();
        assert!(bench.is_empty());
        assert!(bench.histogram(4).is_err());

        bench.advance();
        bench.advance();
        bench.advance();
        assert_eq!(bench.len(), 2);
        assert!(!bench.is_finished());
        assert_eq!(bench.seconds(), vec![0.002, 0.002]);
    }

    #[test]
    fn test_run_with_closure() {
        let mut calls = 0;
        let bench = Benchmark::run(32, || calls += 1).unwrap();
        assert_eq!(calls, 32);
        assert_eq!(bench.laps().len(), 32);
    }
}
