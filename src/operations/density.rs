//! Gaussian kernel density estimation.
//!
//! The bandwidth follows Silverman's rule of thumb,
//! `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`, floored so that near-constant
//! samples still produce a finite, narrow bump instead of a spike.

use ndarray::Array1;
use tracing::debug;

use super::statistics::{Summary, percentile_sorted, sorted_values};
use crate::{LapError, LapResult};

/// Number of points the density curve is evaluated at by default.
pub const DEFAULT_RESOLUTION: usize = 256;

/// How many bandwidths the evaluated range extends past the sample range.
const TAIL_BANDWIDTHS: f64 = 3.0;

/// Smallest bandwidth relative to the magnitude of the sample values.
const RELATIVE_BANDWIDTH_FLOOR: f64 = 1e-3;

/// Smallest bandwidth in absolute terms.
const ABSOLUTE_BANDWIDTH_FLOOR: f64 = 1e-12;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// A density curve sampled at evenly spaced points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct DensityEstimate {
    /// Kernel bandwidth used for the estimate.
    pub bandwidth: f64,
    /// `(value, density)` pairs in ascending value order.
    pub points: Vec<(f64, f64)>,
}

impl DensityEstimate {
    /// Largest density on the curve.
    pub fn peak(&self) -> f64 {
        self.points.iter().map(|&(_, d)| d).fold(0.0, f64::max)
    }
}

/// Chooses a kernel bandwidth for `values`.
pub fn silverman_bandwidth(values: &[f64]) -> LapResult<f64> {
    let summary = Summary::from_values(values)?;
    let sorted = sorted_values(values);

    let iqr = percentile_sorted(&sorted, 0.75)? - percentile_sorted(&sorted, 0.25)?;
    let spread = if iqr > 0.0 {
        summary.std_dev.min(iqr / 1.34)
    } else {
        summary.std_dev
    };

    let rule = 0.9 * spread * (values.len() as f64).powf(-0.2);
    let magnitude = summary.min.abs().max(summary.max.abs());
    let floor = (magnitude * RELATIVE_BANDWIDTH_FLOOR).max(ABSOLUTE_BANDWIDTH_FLOOR);

    if rule.is_finite() {
        Ok(rule.max(floor))
    } else {
        Ok(floor)
    }
}

/// Estimates the probability density of `values` at `resolution` points.
///
/// The curve spans the sample range widened by three bandwidths on each side
/// and integrates to approximately one.
pub fn kernel_density(values: &[f64], resolution: usize) -> LapResult<DensityEstimate> {
    if values.is_empty() {
        return Err(LapError::empty("density"));
    }
    if resolution < 2 {
        return Err(LapError::invalid_config(
            "resolution",
            format!("must be at least 2, got {resolution}"),
        ));
    }

    let bandwidth = silverman_bandwidth(values)?;
    let summary = Summary::from_values(values)?;
    let lo = summary.min - TAIL_BANDWIDTHS * bandwidth;
    let hi = summary.max + TAIL_BANDWIDTHS * bandwidth;

    let norm = 1.0 / (values.len() as f64 * bandwidth);
    let density_at = |x: f64| -> f64 {
        let sum: f64 = values
            .iter()
            .map(|&v| {
                let u = (x - v) / bandwidth;
                (-0.5 * u * u).exp()
            })
            .sum();
        sum * INV_SQRT_2PI * norm
    };

    let xs = Array1::linspace(lo, hi, resolution);

    #[cfg(feature = "parallel-processing")]
    let ys: Vec<f64> = {
        use rayon::prelude::*;
        xs.to_vec().into_par_iter().map(density_at).collect()
    };
    #[cfg(not(feature = "parallel-processing"))]
    let ys: Vec<f64> = xs.mapv(density_at).to_vec();

    debug!(
        samples = values.len(),
        bandwidth, resolution, "computed kernel density estimate"
    );

    Ok(DensityEstimate {
        bandwidth,
        points: xs.iter().copied().zip(ys).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn integrate(points: &[(f64, f64)]) -> f64 {
        points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }

    #[test]
    fn test_empty_sample_is_an_error() {
        let result = kernel_density(&[], DEFAULT_RESOLUTION);
        assert!(matches!(result, Err(LapError::EmptySample { .. })));
    }

    #[test]
    fn test_resolution_must_be_at_least_two() {
        let result = kernel_density(&[1.0, 2.0], 1);
        assert!(matches!(result, Err(LapError::Configuration { .. })));
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 17) as f64 * 0.5).collect();
        let estimate = kernel_density(&values, 512).unwrap();

        assert_eq!(estimate.points.len(), 512);
        assert!(estimate.points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
        assert!(estimate.points.iter().all(|&(_, y)| y >= 0.0));
        assert_approx_eq!(integrate(&estimate.points), 1.0, 1e-2);
    }

    #[test]
    fn test_constant_sample_stays_finite() {
        let values = vec![5e-6; 1000];
        let estimate = kernel_density(&values, DEFAULT_RESOLUTION).unwrap();

        assert!(estimate.bandwidth > 0.0);
        assert!(estimate.peak().is_finite());
        assert!(estimate.points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
        // The curve is centred on the constant value
        let first = estimate.points[0].0;
        let last = estimate.points[estimate.points.len() - 1].0;
        assert_approx_eq!((first + last) / 2.0, 5e-6, 1e-6);
    }

    #[test]
    fn test_single_sample() {
        let estimate = kernel_density(&[3.0], 64).unwrap();
        assert!(estimate.peak().is_finite());
        assert!(estimate.peak() > 0.0);
    }

    #[test]
    fn test_bandwidth_shrinks_with_more_samples() {
        let small: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let large: Vec<f64> = (0..5000).map(|i| (i % 50) as f64).collect();
        let h_small = silverman_bandwidth(&small).unwrap();
        let h_large = silverman_bandwidth(&large).unwrap();
        assert!(h_large < h_small);
    }
}
