//! Bucketed view of a sample with summary statistics.

use std::fmt;
use std::time::Duration;

use colored::Colorize;
use tracing::debug;

use crate::operations::statistics::{Summary, percentile_sorted, sorted_values};
use crate::utils::format_si;
use crate::{LapError, LapResult};

/// Width of the bar column in the text rendering.
const BAR_WIDTH: usize = 40;

/// How the values of a histogram should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// Values are nanoseconds and are shown as durations.
    Nanoseconds,
    /// Values are shown as plain numbers with an SI prefix.
    #[default]
    Plain,
}

impl Unit {
    /// Formats a single value in this unit.
    pub fn format(self, value: f64) -> String {
        match self {
            Unit::Nanoseconds => {
                format!("{:.2?}", Duration::from_nanos(value.max(0.0).round() as u64))
            }
            Unit::Plain => format_si(value),
        }
    }
}

/// Parameters for building a [`Histogram`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramOptions {
    /// Number of buckets.
    pub bin_count: usize,
    /// Fixed upper end of the bucket range. Larger values go to the last bucket.
    pub clamp_maximum: Option<f64>,
    /// Upper end of the bucket range taken as this percentile of the sample.
    pub clamp_percentile: Option<f64>,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self::new(10)
    }
}

impl HistogramOptions {
    /// Options with `bin_count` buckets spanning the full sample range.
    pub const fn new(bin_count: usize) -> Self {
        Self {
            bin_count,
            clamp_maximum: None,
            clamp_percentile: None,
        }
    }

    /// Set a fixed upper end for the bucket range.
    pub const fn with_clamp_maximum(mut self, maximum: f64) -> Self {
        self.clamp_maximum = Some(maximum);
        self
    }

    /// Take the upper end of the bucket range from a percentile in `(0, 1]`.
    pub const fn with_clamp_percentile(mut self, percentile: f64) -> Self {
        self.clamp_percentile = Some(percentile);
        self
    }

    fn validate(&self) -> LapResult<()> {
        if self.bin_count == 0 {
            return Err(LapError::invalid_config("bin_count", "must be > 0"));
        }
        if let Some(max) = self.clamp_maximum {
            if !max.is_finite() {
                return Err(LapError::invalid_config(
                    "clamp_maximum",
                    format!("must be finite, got {max}"),
                ));
            }
        }
        if let Some(p) = self.clamp_percentile {
            if !(p > 0.0 && p <= 1.0) {
                return Err(LapError::invalid_config(
                    "clamp_percentile",
                    format!("must be in (0, 1], got {p}"),
                ));
            }
        }
        Ok(())
    }
}

/// One bucket of a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Bin {
    /// Inclusive lower bound of the bucket.
    pub start: f64,
    /// Width of the bucket.
    pub width: f64,
    /// Number of values in the bucket.
    pub count: usize,
    /// True for the last bucket when it also holds values above the range.
    pub and_above: bool,
}

/// Tail percentiles of the full sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct TailPercentiles {
    /// 50th percentile.
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
    /// 99th percentile.
    pub p99: f64,
    /// 99.9th percentile.
    pub p999: f64,
    /// 99.99th percentile.
    pub p9999: f64,
}

impl TailPercentiles {
    fn from_sorted(sorted: &[f64]) -> LapResult<Self> {
        Ok(Self {
            p50: percentile_sorted(sorted, 0.5)?,
            p90: percentile_sorted(sorted, 0.9)?,
            p99: percentile_sorted(sorted, 0.99)?,
            p999: percentile_sorted(sorted, 0.999)?,
            p9999: percentile_sorted(sorted, 0.9999)?,
        })
    }
}

/// Read-only bucket counts of a sample, plus its summary statistics.
///
/// A histogram is never mutated after construction; build a new one to use a
/// different bucket count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    unit: Unit,
    summary: Summary,
    percentiles: TailPercentiles,
    range: (f64, f64),
    bins: Vec<Bin>,
}

/// Bucket of `value` for `bin_count` equal buckets over `[min, min + width]`.
///
/// Values outside the range are clamped to the first or last bucket.
pub fn bucket_index(value: f64, min: f64, width: f64, bin_count: usize) -> usize {
    let scaled = ((value - min) * bin_count as f64 / width).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(bin_count - 1)
    }
}

fn range_width(min: f64, max: f64) -> LapResult<f64> {
    let width = max - min;
    if width > 0.0 {
        Ok(width)
    } else {
        Err(LapError::DegenerateRange { value: min })
    }
}

impl Histogram {
    /// Builds a histogram of durations, measured in nanoseconds.
    pub fn from_durations(laps: &[Duration], options: HistogramOptions) -> LapResult<Self> {
        let nanos: Vec<f64> = laps.iter().map(|d| d.as_nanos() as f64).collect();
        Self::from_values_in(&nanos, Unit::Nanoseconds, options)
    }

    /// Builds a histogram of plain values.
    pub fn from_values(values: &[f64], options: HistogramOptions) -> LapResult<Self> {
        Self::from_values_in(values, Unit::Plain, options)
    }

    /// Builds a histogram of values displayed in `unit`.
    pub fn from_values_in(values: &[f64], unit: Unit, options: HistogramOptions) -> LapResult<Self> {
        options.validate()?;
        if values.is_empty() {
            return Err(LapError::empty("histogram"));
        }

        let summary = Summary::from_values(values)?;
        let sorted = sorted_values(values);
        let percentiles = TailPercentiles::from_sorted(&sorted)?;

        let mut max = summary.max;
        if let Some(clamp) = options.clamp_maximum {
            max = max.min(clamp);
        }
        if let Some(p) = options.clamp_percentile {
            max = max.min(percentile_sorted(&sorted, p)?);
        }
        let min = summary.min;
        let clamped = summary.max > max;
        // A cap at or below the minimum collapses the range onto it
        let max = max.max(min);
        let bin_count = options.bin_count;
        let overflow = if clamped { bin_count - 1 } else { 0 };

        let mut counts = vec![0usize; bin_count];
        let width = match range_width(min, max) {
            Ok(width) => {
                for &v in values {
                    counts[bucket_index(v, min, width, bin_count)] += 1;
                }
                width
            }
            Err(LapError::DegenerateRange { value }) => {
                debug!(value, bucket = overflow, "degenerate histogram range");
                counts[overflow] = values.len();
                0.0
            }
            Err(err) => return Err(err),
        };

        let bin_width = width / bin_count as f64;
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                start: min + bin_width * i as f64,
                width: bin_width,
                count,
                and_above: clamped && i == bin_count - 1,
            })
            .collect();

        debug!(
            samples = values.len(),
            bin_count, min, max, "built histogram"
        );

        Ok(Self {
            unit,
            summary,
            percentiles,
            range: (min, max),
            bins,
        })
    }

    /// The buckets in ascending order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Per-bucket counts.
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// Total number of values across all buckets.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// The `(min, max)` range covered by the buckets.
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Summary statistics of the full sample.
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Tail percentiles of the full sample.
    pub const fn percentiles(&self) -> &TailPercentiles {
        &self.percentiles
    }

    /// Display unit of the values.
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Bucket that `value` falls into.
    pub fn bucket_of(&self, value: f64) -> usize {
        let (min, max) = self.range;
        match range_width(min, max) {
            Ok(width) => bucket_index(value, min, width, self.bins.len()),
            Err(_) => self.bins.iter().position(|b| b.and_above).unwrap_or(0),
        }
    }

    /// The text table with ANSI colours.
    pub fn colored(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.render(&mut out, true);
        out
    }

    fn render(&self, out: &mut impl fmt::Write, colorize: bool) -> fmt::Result {
        let unit = self.unit;
        let s = &self.summary;
        let p = &self.percentiles;

        writeln!(
            out,
            "  avg {};  min {};  p50 {};  max {};",
            unit.format(s.mean),
            unit.format(s.min),
            unit.format(p.p50),
            unit.format(s.max)
        )?;
        writeln!(
            out,
            "  p90 {};  p99 {};  p999 {};  p9999 {};",
            unit.format(p.p90),
            unit.format(p.p99),
            unit.format(p.p999),
            unit.format(p.p9999)
        )?;

        let labels: Vec<String> = self
            .bins
            .iter()
            .map(|bin| {
                let mut label = unit.format(bin.start);
                if bin.and_above {
                    label.push('+');
                }
                label
            })
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let count_width = self
            .bins
            .iter()
            .map(|b| b.count.to_string().len())
            .max()
            .unwrap_or(1);
        let max_count = self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

        for (bin, label) in self.bins.iter().zip(labels) {
            let filled = bin.count * BAR_WIDTH / max_count;
            let bar = if filled == 0 && bin.count > 0 {
                "▏".to_string()
            } else {
                "█".repeat(filled)
            };

            let label = format!("{label:>label_width$}");
            let count = format!("{:>count_width$}", bin.count);
            if colorize {
                writeln!(out, " {} [{}] {}", label.dimmed(), count, bar.green())?;
            } else {
                writeln!(out, " {label} [{count}] {bar}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_counts_sum_to_sample_size() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64).collect();
        for bins in [1, 2, 7, 10, 64] {
            let histogram = Histogram::from_values(&values, HistogramOptions::new(bins)).unwrap();
            assert_eq!(histogram.bins().len(), bins);
            assert_eq!(histogram.total(), values.len());
            assert!(values.iter().all(|&v| histogram.bucket_of(v) < bins));
        }
    }

    #[test]
    fn test_bucket_assignment() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let histogram = Histogram::from_values(&values, HistogramOptions::new(5)).unwrap();
        // width 2: [0,2) [2,4) [4,6) [6,8) [8,10], max lands in the last bucket
        assert_eq!(histogram.counts(), vec![2, 2, 2, 2, 3]);
        assert_eq!(histogram.bucket_of(10.0), 4);
        assert_eq!(histogram.bucket_of(0.0), 0);
        assert_approx_eq!(histogram.bins()[1].start, 2.0, 1e-12);
    }

    #[test]
    fn test_constant_sample_goes_to_first_bucket() {
        let values = vec![42.0; 17];
        let histogram = Histogram::from_values(&values, HistogramOptions::new(4)).unwrap();
        assert_eq!(histogram.counts(), vec![17, 0, 0, 0]);
        assert_eq!(histogram.bucket_of(42.0), 0);
    }

    #[test]
    fn test_invalid_options() {
        let values = [1.0, 2.0];
        assert!(Histogram::from_values(&values, HistogramOptions::new(0)).is_err());
        assert!(
            Histogram::from_values(&values, HistogramOptions::new(2).with_clamp_percentile(0.0))
                .is_err()
        );
        assert!(
            Histogram::from_values(
                &values,
                HistogramOptions::new(2).with_clamp_maximum(f64::NAN)
            )
            .is_err()
        );
    }

    #[test]
    fn test_empty_sample() {
        let result = Histogram::from_values(&[], HistogramOptions::default());
        assert!(matches!(result, Err(LapError::EmptySample { .. })));
    }

    #[test]
    fn test_clamp_keeps_every_sample() {
        let mut values: Vec<f64> = (0..100).map(f64::from).collect();
        values.push(10_000.0);

        let options = HistogramOptions::new(10).with_clamp_maximum(100.0);
        let histogram = Histogram::from_values(&values, options).unwrap();
        assert_eq!(histogram.total(), values.len());
        assert_eq!(histogram.range(), (0.0, 100.0));
        let last = histogram.bins()[9];
        assert!(last.and_above);
        assert_eq!(last.count, 11);

        let options = HistogramOptions::new(10).with_clamp_percentile(0.5);
        let histogram = Histogram::from_values(&values, options).unwrap();
        assert_eq!(histogram.total(), values.len());
        assert_eq!(histogram.range(), (0.0, 50.0));
    }

    #[test]
    fn test_clamp_below_minimum_fills_last_bucket() {
        let values = [10.0, 20.0, 30.0];
        let options = HistogramOptions::new(4).with_clamp_maximum(5.0);
        let histogram = Histogram::from_values(&values, options).unwrap();

        assert_eq!(histogram.counts(), vec![0, 0, 0, 3]);
        assert!(histogram.bins()[3].and_above);
        let (min, max) = histogram.range();
        assert!(min <= max);
        assert_eq!(histogram.range(), (10.0, 10.0));
        assert_eq!(histogram.bucket_of(25.0), 3);

        // A constant sample without a cap still uses the first bucket
        let constant = Histogram::from_values(&[7.0; 5], HistogramOptions::new(4)).unwrap();
        assert_eq!(constant.counts(), vec![5, 0, 0, 0]);
        assert_eq!(constant.bucket_of(7.0), 0);
    }

    #[test]
    fn test_summary_and_percentiles() {
        let values: Vec<f64> = (1..=5).map(f64::from).collect();
        let histogram = Histogram::from_values(&values, HistogramOptions::new(2)).unwrap();
        assert_approx_eq!(histogram.summary().mean, 3.0, 1e-12);
        assert_eq!(histogram.percentiles().p50, 3.0);
        assert!(histogram.percentiles().p9999 <= 5.0);
    }

    #[test]
    fn test_display_duration_table() {
        let laps: Vec<Duration> = (0..10).map(|_| Duration::from_micros(5)).collect();
        let histogram = Histogram::from_durations(&laps, HistogramOptions::new(3)).unwrap();
        assert_eq!(histogram.unit(), Unit::Nanoseconds);

        let text = histogram.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 3);
        assert!(lines[0].contains("avg 5.00µs"));
        assert!(lines[2].contains("[10]"));
        assert!(lines[2].ends_with(&"█".repeat(BAR_WIDTH)));
        assert!(lines[3].contains("[ 0]"));
    }
}
