//! Lap timer that can be shared between threads.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::histogram::{Histogram, HistogramOptions};
use crate::{LapError, LapResult};

/// Marks a slot that has not been written yet.
const UNSET: u64 = u64::MAX;

/// Handle to a started lap, consumed by [`Stopwatch::stop`].
#[derive(Debug, PartialEq, Eq)]
pub struct Lap(usize);

impl Lap {
    /// Slot index of this lap.
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// A fixed number of lap slots that any thread may start and stop.
///
/// Slots are claimed with a single atomic increment, so laps from different
/// threads never contend for the same slot.
#[derive(Debug)]
pub struct Stopwatch {
    epoch: Instant,
    next: AtomicUsize,
    starts: Box<[AtomicU64]>,
    stops: Box<[AtomicU64]>,
}

impl Stopwatch {
    /// Creates a stopwatch with room for `capacity` laps.
    pub fn new(capacity: usize) -> LapResult<Self> {
        if capacity == 0 {
            return Err(LapError::invalid_config("capacity", "must be > 0"));
        }
        let slots = || -> Box<[AtomicU64]> {
            (0..capacity).map(|_| AtomicU64::new(UNSET)).collect()
        };
        Ok(Self {
            epoch: Instant::now(),
            next: AtomicUsize::new(0),
            starts: slots(),
            stops: slots(),
        })
    }

    #[inline]
    fn now_nanos(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Starts a new lap, or returns `None` once every slot has been claimed.
    #[inline]
    pub fn start(&self) -> Option<Lap> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        let slot = self.starts.get(index)?;
        slot.store(self.now_nanos(), Ordering::Release);
        Some(Lap(index))
    }

    /// Stops a lap started by [`Stopwatch::start`].
    ///
    /// A lap whose slot does not exist here (one taken from a larger
    /// stopwatch) is ignored.
    #[inline]
    pub fn stop(&self, lap: Lap) {
        let now = self.now_nanos();
        if let Some(slot) = self.stops.get(lap.0) {
            slot.store(now, Ordering::Release);
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.starts.len()
    }

    /// Number of laps started so far.
    pub fn started(&self) -> usize {
        self.next.load(Ordering::Relaxed).min(self.capacity())
    }

    /// Returns true once every slot has been claimed.
    pub fn is_full(&self) -> bool {
        self.started() == self.capacity()
    }

    /// Durations of all stopped laps, in slot order.
    pub fn durations(&self) -> Vec<Duration> {
        self.starts
            .iter()
            .zip(self.stops.iter())
            .take(self.started())
            .filter_map(|(start, stop)| {
                let start = start.load(Ordering::Acquire);
                let stop = stop.load(Ordering::Acquire);
                (start != UNSET && stop != UNSET)
                    .then(|| Duration::from_nanos(stop.saturating_sub(start)))
            })
            .collect()
    }

    /// Histogram of the stopped laps with `bin_count` buckets.
    pub fn histogram(&self, bin_count: usize) -> LapResult<Histogram> {
        Histogram::from_durations(&self.durations(), HistogramOptions::new(bin_count))
    }
}
