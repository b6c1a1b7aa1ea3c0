//! Summary statistics over sample values.
//!
//! These helpers treat their input as a multiset of `f64` values. Durations
//! are converted with [`durations_to_seconds`] before they reach the plotting
//! layer, and any numeric slice can be widened with [`to_f64_values`].

use std::time::Duration;

use ndarray::ArrayView1;
use num_traits::ToPrimitive;

use crate::{LapError, LapResult};

/// Converts a sequence of durations to floating-point seconds.
///
/// The mapping is one-to-one and preserves order.
pub fn durations_to_seconds(durations: &[Duration]) -> Vec<f64> {
    durations.iter().map(Duration::as_secs_f64).collect()
}

/// Converts a numeric slice to `f64`, dropping values that have no finite
/// `f64` representation.
pub fn to_f64_values<T: ToPrimitive>(values: &[T]) -> Vec<f64> {
    values
        .iter()
        .filter_map(ToPrimitive::to_f64)
        .filter(|v| v.is_finite())
        .collect()
}

/// Returns an ascending copy of `values`.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Value at percentile `p` of an already sorted sample.
///
/// `p` is clamped to `[0, 1]`. The result interpolates linearly between the
/// two order statistics surrounding rank `p * (n - 1)`, so `p = 0` yields the
/// minimum and `p = 1` the maximum.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> LapResult<f64> {
    let n = sorted.len();
    if n == 0 {
        return Err(LapError::empty("percentile"));
    }
    if n == 1 {
        return Ok(sorted[0]);
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Value at percentile `p` of an unsorted sample.
pub fn percentile(values: &[f64], p: f64) -> LapResult<f64> {
    percentile_sorted(&sorted_values(values), p)
}

/// Basic descriptive statistics of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (zero for fewer than two values).
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Summary {
    /// Computes the summary of `values`.
    pub fn from_values(values: &[f64]) -> LapResult<Self> {
        if values.is_empty() {
            return Err(LapError::empty("summary"));
        }

        let view = ArrayView1::from(values);
        let mean = view.mean().ok_or(LapError::empty("summary"))?;
        let std_dev = if values.len() > 1 {
            view.var(1.0).sqrt()
        } else {
            0.0
        };

        let (min, max) = min_max(values);

        Ok(Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }

    /// Width of the `[min, max]` range.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Smallest and largest of `values`, or `(inf, -inf)` when empty.
pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_durations_to_seconds() {
        let laps = [
            Duration::from_micros(5),
            Duration::from_millis(2),
            Duration::from_secs(1),
        ];
        let seconds = durations_to_seconds(&laps);
        assert_eq!(seconds.len(), 3);
        assert_approx_eq!(seconds[0], 5e-6, 1e-9);
        assert_approx_eq!(seconds[1], 2e-3, 1e-9);
        assert_approx_eq!(seconds[2], 1.0, 1e-9);
    }

    #[test]
    fn test_to_f64_values_accepts_integers() {
        let values = to_f64_values(&[1u32, 2, 3]);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);

        let values = to_f64_values(&[1.0f64, f64::NAN, f64::INFINITY, 4.0]);
        assert_eq!(values, vec![1.0, 4.0]);
    }

    #[test]
    fn test_percentile_interpolation() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&values, 0.5).unwrap(), 3.0);
        assert_eq!(percentile(&values, 1.0).unwrap(), 5.0);
        // rank 0.25 * 4 = 1.0 -> exactly the second order statistic
        assert_eq!(percentile(&values, 0.25).unwrap(), 2.0);
        // rank 0.1 * 4 = 0.4 -> 1.0 + 0.4 * (2.0 - 1.0)
        assert_approx_eq!(percentile(&values, 0.1).unwrap(), 1.4, 1e-9);
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert!(matches!(
            percentile(&[], 0.5),
            Err(LapError::EmptySample { .. })
        ));
        assert_eq!(percentile(&[7.0], 0.99).unwrap(), 7.0);
        // Out-of-range percentiles are clamped
        assert_eq!(percentile(&[1.0, 2.0], -1.0).unwrap(), 1.0);
        assert_eq!(percentile(&[1.0, 2.0], 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_approx_eq!(summary.mean, 3.0, 1e-9);
        // sample variance = 10 / 4
        assert_approx_eq!(summary.std_dev, 2.5f64.sqrt(), 1e-9);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.range(), 4.0);

        let single = Summary::from_values(&[2.0]).unwrap();
        assert_eq!(single.std_dev, 0.0);

        assert!(Summary::from_values(&[]).is_err());
    }
}
