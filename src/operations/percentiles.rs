//! Percentile curves with tail-dense evaluation points.

use super::statistics::{percentile_sorted, sorted_values};
use crate::{LapError, LapResult};

/// Largest percentile that is evaluated or displayed (99.99%).
pub const MAX_PERCENTILE: f64 = 0.9999;

/// Evaluation points on the linear part of the curve, `[0, 0.9)`, are
/// spaced `1 / BULK_RESOLUTION` apart.
const BULK_RESOLUTION: usize = 100;

/// Evaluation points per decade of the tail (90%..99%, 99%..99.9%, ...).
const TAIL_STEPS_PER_DECADE: usize = 20;

/// Number of tail decades between 0.9 and [`MAX_PERCENTILE`].
const TAIL_DECADES: i32 = 3;

/// Percentiles at which a curve is evaluated.
///
/// Points are evenly spaced up to 90% and then evenly spaced in
/// `-log10(1 - p)` for each following decade, so every tail decade is resolved
/// with the same number of points. The sequence is strictly increasing, starts at `0` and ends at
/// exactly [`MAX_PERCENTILE`].
pub fn evaluation_points() -> Vec<f64> {
    let bulk_steps = BULK_RESOLUTION * 9 / 10;
    let mut points =
        Vec::with_capacity(bulk_steps + TAIL_STEPS_PER_DECADE * TAIL_DECADES as usize + 1);
    points.extend((0..bulk_steps).map(|i| i as f64 / BULK_RESOLUTION as f64));

    for decade in 1..=TAIL_DECADES {
        for step in 0..TAIL_STEPS_PER_DECADE {
            let t = decade as f64 + step as f64 / TAIL_STEPS_PER_DECADE as f64;
            points.push(1.0 - 10f64.powf(-t));
        }
    }
    points.push(MAX_PERCENTILE);
    points
}

/// `(percentile, value)` pairs describing the distribution of a sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PercentileCurve {
    /// Points in ascending percentile order.
    pub points: Vec<(f64, f64)>,
}

impl PercentileCurve {
    /// Evaluates the percentile curve of `values` at [`evaluation_points`].
    pub fn from_values(values: &[f64]) -> LapResult<Self> {
        Self::at(values, &evaluation_points())
    }

    /// Evaluates the percentile curve of `values` at the given percentiles.
    pub fn at(values: &[f64], percentiles: &[f64]) -> LapResult<Self> {
        if values.is_empty() {
            return Err(LapError::empty("percentiles"));
        }

        let sorted = sorted_values(values);
        let points = percentiles
            .iter()
            .map(|&p| Ok((p, percentile_sorted(&sorted, p)?)))
            .collect::<LapResult<Vec<_>>>()?;

        Ok(Self { points })
    }

    /// Value at the evaluation point closest to `p`.
    pub fn value_near(&self, p: f64) -> Option<f64> {
        self.points
            .iter()
            .min_by(|a, b| (a.0 - p).abs().total_cmp(&(b.0 - p).abs()))
            .map(|&(_, v)| v)
    }
}
