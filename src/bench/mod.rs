//! Latency sampling.
//!
//! [`Benchmark`] records one lap per iteration of a single-threaded loop with
//! storage reserved up front. [`Stopwatch`] hands out lap slots that several
//! threads can fill concurrently. Both summarise into a [`Histogram`].

pub mod benchmark;
pub mod clock;
pub mod histogram;
pub mod stopwatch;

pub use benchmark::Benchmark;
pub use clock::{Clock, MonotonicClock, SteppingClock};
pub use histogram::{Bin, Histogram, HistogramOptions, TailPercentiles, Unit};
pub use stopwatch::{Lap, Stopwatch};
