// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![warn(missing_docs)]

//! # LapSamples
//!
//! Low-overhead latency sampling and statistical plotting for Rust.
//!
//! The crate has two halves that meet at a plain `Vec<f64>` of seconds:
//!
//! - **Sampling** ([`bench`]): a [`Benchmark`] records one lap per iteration of a
//!   tight loop into storage reserved up front, and a [`Stopwatch`] does the same
//!   for laps started and stopped on different threads. Either one summarises
//!   into a [`Histogram`] that prints as a console bar chart.
//! - **Plotting** ([`plotting`]): series of samples (raw timings, kernel density,
//!   percentile curves) are composed into groups and stacks, laid out on a
//!   canvas and serialized to SVG.
//!
//! ## Features
//!
//! - `serialization`: `serde` support for summaries, curves and plot geometry
//! - `parallel-processing`: evaluate density curves with `rayon`
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`LapResult`]:
//!
//! ```rust
//! use lap_samples::{Benchmark, LapError};
//!
//! match Benchmark::new(0) {
//!     Ok(_) => unreachable!(),
//!     Err(LapError::Configuration { parameter, .. }) => assert_eq!(parameter, "capacity"),
//!     Err(other) => panic!("unexpected error: {other}"),
//! }
//! ```
//!
//! Running out of laps is not an error: [`Benchmark::advance`] simply returns
//! `false` once the run is full.
//!
//! ## Quick Start
//!
//! ### Sampling
//!
//! ```rust
//! use lap_samples::Benchmark;
//!
//! let mut bench = Benchmark::new(1000).unwrap();
//! while bench.advance() {
//!     std::hint::black_box((0..100).map(|x| x * x).sum::<u64>());
//! }
//!
//! let histogram = bench.histogram(10).unwrap();
//! assert_eq!(histogram.total(), 1000);
//! println!("{histogram}");
//! ```
//!
//! ### Plotting
//!
//! ```rust
//! use lap_samples::{Benchmark, SteppingClock};
//! use lap_samples::plotting::*;
//! use std::time::Duration;
//!
//! # fn example() -> lap_samples::LapResult<()> {
//! let clock = SteppingClock::new(Duration::from_micros(20));
//! let mut bench = Benchmark::with_clock(200, clock)?;
//! bench.measure(|| ());
//! let seconds = bench.seconds();
//!
//! let plot = Plot::new().add(
//!     Stack::vertical()
//!         .with_margin(Margin::uniform(5.0))
//!         .add(Group::new().add(Grid).add(Line::new("timing", points(None, &seconds)?)))
//!         .add(Group::new().add(Density::new("density", &seconds)?).add(TickLabels))
//!         .add(
//!             Group::new()
//!                 .with_x_axis(Axis::percentile())
//!                 .add(Gizmo)
//!                 .add(Percentiles::new("percentiles", &seconds)?)
//!                 .add(TickLabels),
//!         ),
//! );
//! let svg = plot.render_svg(800.0, 600.0)?;
//! assert!(svg.starts_with(b"<svg"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod bench;
pub mod error;
pub mod operations;
pub mod utils;

pub use bench::{
    Benchmark, Bin, Clock, Histogram, HistogramOptions, Lap, MonotonicClock, SteppingClock,
    Stopwatch, TailPercentiles, Unit,
};
pub use error::{LapError, LapResult};
pub use operations::plotting;
pub use operations::{
    DensityEstimate, PercentileCurve, Summary, durations_to_seconds, kernel_density, percentile,
};
