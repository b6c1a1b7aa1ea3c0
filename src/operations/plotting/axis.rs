//! Data-to-pixel transforms and tick placement.
//!
//! An [`Axis`] is configuration: its kind and optional fixed limits. Once the
//! data bounds and the pixel extent of a group are known it is resolved into a
//! [`ResolvedAxis`], which owns the final domain, the transform and the ticks.

use tracing::trace;

use super::core::Range;
use crate::operations::percentiles::MAX_PERCENTILE;
use crate::utils::{format_number, format_scaled, si_prefix};

/// Ticks shown on a percentile axis.
const PERCENTILE_TICKS: [f64; 6] = [0.0, 0.5, 0.9, 0.99, 0.999, MAX_PERCENTILE];

/// How data values are spread along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisKind {
    /// Values map linearly to pixels.
    #[default]
    Linear,
    /// Percentiles in `[0, 1)` map through `-log10(1 - p)`, so every decade
    /// of the tail (90%, 99%, 99.9%, ...) gets the same width.
    Percentile,
}

/// Axis configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    /// Transform kind.
    pub kind: AxisKind,
    /// Fixed lower limit; fitted to the data when `None`.
    pub min: Option<f64>,
    /// Fixed upper limit; fitted to the data when `None`.
    pub max: Option<f64>,
    /// Expand fitted limits outwards to whole tick steps.
    pub nice: bool,
    /// Approximate number of ticks on a linear axis.
    pub tick_count: usize,
}

impl Default for Axis {
    fn default() -> Self {
        Self::linear()
    }
}

impl Axis {
    /// A linear axis fitted to the data.
    pub const fn linear() -> Self {
        Self {
            kind: AxisKind::Linear,
            min: None,
            max: None,
            nice: true,
            tick_count: 6,
        }
    }

    /// A percentile axis spanning `[0, 99.99%]`.
    pub const fn percentile() -> Self {
        Self {
            kind: AxisKind::Percentile,
            ..Self::linear()
        }
    }

    /// Fix both limits.
    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Fix the lower limit.
    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Fix the upper limit.
    pub const fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Enable or disable expanding to whole tick steps.
    pub const fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Resolve against data `data`, mapping the domain onto pixels
    /// `screen_from..screen_to`.
    ///
    /// For a vertical axis pass the bottom edge as `screen_from` so larger
    /// values are drawn higher up.
    pub fn resolve(&self, data: Option<Range>, screen_from: f64, screen_to: f64) -> ResolvedAxis {
        let resolved = match self.kind {
            AxisKind::Linear => self.resolve_linear(data, screen_from, screen_to),
            AxisKind::Percentile => ResolvedAxis {
                kind: AxisKind::Percentile,
                domain: Range::new(
                    self.min.unwrap_or(0.0).clamp(0.0, MAX_PERCENTILE),
                    self.max.unwrap_or(MAX_PERCENTILE).clamp(0.0, MAX_PERCENTILE),
                ),
                screen: (screen_from, screen_to),
                ticks: Vec::new(),
            }
            .with_percentile_ticks(),
        };
        trace!(
            kind = ?resolved.kind,
            min = resolved.domain.min,
            max = resolved.domain.max,
            ticks = resolved.ticks.len(),
            "resolved axis"
        );
        resolved
    }

    fn resolve_linear(&self, data: Option<Range>, screen_from: f64, screen_to: f64) -> ResolvedAxis {
        let fitted = data.unwrap_or(Range::new(0.0, 1.0));
        let mut min = self.min.unwrap_or(fitted.min);
        let mut max = self.max.unwrap_or(fitted.max);

        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if max <= min {
            // A single fixed limit stays put and the fitted end moves past it
            match (self.min.is_some(), self.max.is_some()) {
                (true, false) => max = min + 2.0 * padding(min),
                (false, true) => min = max - 2.0 * padding(max),
                _ => {
                    if max < min {
                        std::mem::swap(&mut min, &mut max);
                    }
                    if max == min {
                        let pad = padding(min);
                        min -= pad;
                        max += pad;
                    }
                }
            }
        }

        let step = nice_step(max - min, self.tick_count);
        if self.nice {
            if self.min.is_none() {
                min = (min / step + 1e-9).floor() * step;
            }
            if self.max.is_none() {
                max = (max / step - 1e-9).ceil() * step;
            }
        }

        let domain = Range::new(min, max);
        ResolvedAxis {
            kind: AxisKind::Linear,
            domain,
            screen: (screen_from, screen_to),
            ticks: linear_ticks(domain, step),
        }
    }
}

/// Half-width used to widen a zero-width range around `value`.
fn padding(value: f64) -> f64 {
    if value == 0.0 { 0.5 } else { value.abs() * 0.1 }
}

/// A tick position and its label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    /// Data-space position.
    pub value: f64,
    /// Text shown next to the tick.
    pub label: String,
}

/// An axis with its final domain, pixel extent and ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAxis {
    kind: AxisKind,
    domain: Range,
    screen: (f64, f64),
    ticks: Vec<Tick>,
}

impl ResolvedAxis {
    /// Transform kind.
    pub const fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Data-space domain.
    pub const fn domain(&self) -> Range {
        self.domain
    }

    /// Pixel positions of the domain's lower and upper end.
    pub const fn screen(&self) -> (f64, f64) {
        self.screen
    }

    /// Ticks in ascending value order.
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Position of `value` as a fraction of the domain, before scaling to pixels.
    pub fn normalize(&self, value: f64) -> f64 {
        match self.kind {
            AxisKind::Linear => (value - self.domain.min) / self.domain.span(),
            AxisKind::Percentile => {
                let lo = tail_stretch(self.domain.min);
                let hi = tail_stretch(self.domain.max);
                if hi > lo {
                    (tail_stretch(value) - lo) / (hi - lo)
                } else {
                    0.0
                }
            }
        }
    }

    /// Maps a data value to a pixel coordinate.
    pub fn to_screen(&self, value: f64) -> f64 {
        let (from, to) = self.screen;
        from + (to - from) * self.normalize(value)
    }

    fn with_percentile_ticks(mut self) -> Self {
        self.ticks = PERCENTILE_TICKS
            .iter()
            .filter(|&&p| self.domain.contains(p))
            .map(|&p| Tick {
                value: p,
                label: format!("{}%", format_number(p * 100.0)),
            })
            .collect();
        self
    }
}

/// `-log10(1 - p)` with `p` clamped to `[0, MAX_PERCENTILE]`.
pub fn tail_stretch(p: f64) -> f64 {
    -(1.0 - p.clamp(0.0, MAX_PERCENTILE)).log10()
}

/// A 1, 2 or 5 times a power of ten close to `span / (count - 1)`.
pub fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span / count.saturating_sub(1).max(1) as f64;
    if !(raw > 0.0 && raw.is_finite()) {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn linear_ticks(domain: Range, step: f64) -> Vec<Tick> {
    let epsilon = step * 1e-9;
    let first = (domain.min / step - 1e-9).ceil();
    let prefix = si_prefix(domain.min.abs().max(domain.max.abs()));
    let decimals = (-(step / prefix.0).log10() - 1e-9).ceil().max(0.0) as usize;

    (0..)
        .map(|i| (first + i as f64) * step)
        .take_while(|&v| v <= domain.max + epsilon)
        .map(|v| if v.abs() < epsilon { 0.0 } else { v })
        .map(|value| Tick {
            value,
            label: format_scaled(value, prefix, decimals),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(10.0, 6), 2.0);
        assert_eq!(nice_step(1.0, 11), 0.1);
        assert_approx_eq!(nice_step(4.2e-6, 6), 1e-6, 1e-9);
        assert_eq!(nice_step(0.0, 6), 1.0);
    }

    #[test]
    fn test_linear_axis_fits_and_expands() {
        let axis = Axis::linear().resolve(Some(Range::new(0.3, 9.6)), 0.0, 100.0);
        assert_eq!(axis.domain(), Range::new(0.0, 10.0));
        let values: Vec<f64> = axis.ticks().iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(axis.ticks()[1].label, "2");
        assert_eq!(axis.to_screen(5.0), 50.0);
    }

    #[test]
    fn test_fixed_limits_are_kept() {
        let axis = Axis::linear()
            .with_range(-1.0, 1.0)
            .resolve(Some(Range::new(0.0, 100.0)), 0.0, 10.0);
        assert_eq!(axis.domain(), Range::new(-1.0, 1.0));
        assert_eq!(axis.to_screen(0.0), 5.0);
    }

    #[test]
    fn test_single_fixed_limit_is_never_swapped() {
        let data = Some(Range::new(1.0, 5.0));

        let axis = Axis::linear().with_min(10.0).resolve(data, 0.0, 100.0);
        assert_eq!(axis.domain().min, 10.0);
        assert!(axis.domain().max > 10.0);
        assert_eq!(axis.to_screen(10.0), 0.0);

        let axis = Axis::linear().with_max(-3.0).resolve(data, 0.0, 100.0);
        assert_eq!(axis.domain().max, -3.0);
        assert!(axis.domain().min < -3.0);

        // Fixed at the data maximum the range still gains width upwards
        let axis = Axis::linear().with_min(5.0).resolve(data, 0.0, 100.0);
        assert_eq!(axis.domain().min, 5.0);
        assert!(axis.domain().span() > 0.0);

        // Both limits fixed the other way round are reordered
        let axis = Axis::linear().with_range(4.0, 2.0).resolve(data, 0.0, 100.0);
        assert_eq!(axis.domain(), Range::new(2.0, 4.0));
    }

    #[test]
    fn test_inverted_screen_for_vertical_axes() {
        let axis = Axis::linear()
            .with_nice(false)
            .resolve(Some(Range::new(0.0, 1.0)), 300.0, 0.0);
        assert_eq!(axis.to_screen(0.0), 300.0);
        assert_eq!(axis.to_screen(1.0), 0.0);
    }

    #[test]
    fn test_degenerate_data_is_widened() {
        let axis = Axis::linear().resolve(Some(Range::new(5e-6, 5e-6)), 0.0, 100.0);
        let domain = axis.domain();
        assert!(domain.min < 5e-6 && domain.max > 5e-6);
        assert!(axis.to_screen(5e-6).is_finite());

        let axis = Axis::linear().resolve(Some(Range::new(0.0, 0.0)), 0.0, 100.0);
        assert!(axis.domain().span() > 0.0);

        let axis = Axis::linear().resolve(None, 0.0, 100.0);
        assert_eq!(axis.domain(), Range::new(0.0, 1.0));
    }

    #[test]
    fn test_small_values_use_si_labels() {
        let axis = Axis::linear().resolve(Some(Range::new(0.0, 1e-5)), 0.0, 100.0);
        let labels: Vec<&str> = axis.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "2µ", "4µ", "6µ", "8µ", "10µ"]);
    }

    #[test]
    fn test_percentile_axis_stretches_tail() {
        let axis = Axis::percentile().resolve(None, 0.0, 400.0);
        assert_eq!(axis.kind(), AxisKind::Percentile);
        assert_eq!(axis.to_screen(0.0), 0.0);
        assert_approx_eq!(axis.to_screen(MAX_PERCENTILE), 400.0, 1e-9);
        // Every decade gets a quarter of the width
        assert_approx_eq!(axis.to_screen(0.9), 100.0, 1e-9);
        assert_approx_eq!(axis.to_screen(0.99), 200.0, 1e-9);
        assert_approx_eq!(axis.to_screen(0.999), 300.0, 1e-9);
        // Values past the maximum are clamped instead of diverging
        assert_approx_eq!(axis.to_screen(1.0), 400.0, 1e-9);

        let labels: Vec<&str> = axis.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0%", "50%", "90%", "99%", "99.9%", "99.99%"]);
    }

    #[test]
    fn test_percentile_transform_is_monotonic() {
        let axis = Axis::percentile().resolve(None, 0.0, 1.0);
        let points = crate::operations::percentiles::evaluation_points();
        let xs: Vec<f64> = points.iter().map(|&p| axis.to_screen(p)).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }
}
