//! Statistical transforms over latency samples and their plotting.
//!
//! ## Module Organization
//!
//! - [`statistics`] - Summary statistics, percentiles and unit conversion
//! - [`density`] - Gaussian kernel density estimation
//! - [`percentiles`] - Percentile curves with tail-dense evaluation points
//! - [`plotting`] - Plot tree, axes and SVG canvas
//!
//! ## Quick Start
//!
//! ```rust
//! use lap_samples::operations::{PercentileCurve, Summary, kernel_density};
//!
//! # fn example() -> lap_samples::LapResult<()> {
//! let seconds = [0.001, 0.002, 0.003, 0.004, 0.005];
//!
//! let summary = Summary::from_values(&seconds)?;
//! assert_eq!(summary.count, 5);
//!
//! let curve = PercentileCurve::from_values(&seconds)?;
//! assert_eq!(curve.value_near(0.5), Some(0.003));
//!
//! let density = kernel_density(&seconds, 64)?;
//! assert_eq!(density.points.len(), 64);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod density;
pub mod percentiles;
pub mod plotting;
pub mod statistics;

pub use density::{DEFAULT_RESOLUTION, DensityEstimate, kernel_density, silverman_bandwidth};
pub use percentiles::{MAX_PERCENTILE, PercentileCurve, evaluation_points};
pub use statistics::{
    Summary, durations_to_seconds, percentile, percentile_sorted, sorted_values, to_f64_values,
};
