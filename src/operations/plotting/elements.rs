//! Leaf elements of the plot tree.
//!
//! Series ([`Line`], [`Density`], [`Percentiles`]) own their data and report
//! data-space bounds. Decorations ([`Grid`], [`Gizmo`], [`AxisLines`],
//! [`TickLabels`]) own nothing and draw from the frame they are handed.

use num_traits::ToPrimitive;

use super::canvas::{Anchor, Canvas};
use super::core::{Bounds, Frame, PlotElement, Point, Range, Stroke};
use crate::operations::density::{DEFAULT_RESOLUTION, DensityEstimate, kernel_density};
use crate::operations::percentiles::{MAX_PERCENTILE, PercentileCurve};
use crate::operations::statistics::to_f64_values;
use crate::{LapError, LapResult};

/// Gap between tick labels and the frame edge, in pixels.
const LABEL_PADDING: f64 = 3.0;

/// Pairs `ys` with `xs`, or with their index when `xs` is `None`.
pub fn points(xs: Option<&[f64]>, ys: &[f64]) -> LapResult<Vec<Point>> {
    match xs {
        None => Ok(ys
            .iter()
            .enumerate()
            .map(|(i, &y)| Point::new(i as f64, y))
            .collect()),
        Some(xs) if xs.len() == ys.len() => Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| Point::new(x, y))
            .collect()),
        Some(xs) => Err(LapError::invalid_config(
            "xs",
            format!("expected {} x values, got {}", ys.len(), xs.len()),
        )),
    }
}

/// Grid lines at every tick of both axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grid;

impl PlotElement for Grid {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let rect = frame.rect;
        let stroke = frame.theme.grid;
        for tick in frame.x.ticks() {
            let x = frame.x.to_screen(tick.value);
            canvas.line(Point::new(x, rect.y0), Point::new(x, rect.y1), stroke);
        }
        for tick in frame.y.ticks() {
            let y = frame.y.to_screen(tick.value);
            canvas.line(Point::new(rect.x0, y), Point::new(rect.x1, y), stroke);
        }
    }
}

/// Border around the data area.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gizmo;

impl PlotElement for Gizmo {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        canvas.rect_shape(frame.rect, Some(frame.theme.frame), None);
    }
}

/// X and Y baselines with tick marks pointing away from the data area.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisLines;

impl PlotElement for AxisLines {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let rect = frame.rect;
        let stroke = frame.theme.axis;
        let length = frame.theme.tick_length;

        canvas.line(Point::new(rect.x0, rect.y1), Point::new(rect.x1, rect.y1), stroke);
        for tick in frame.x.ticks() {
            let x = frame.x.to_screen(tick.value);
            canvas.line(Point::new(x, rect.y1), Point::new(x, rect.y1 + length), stroke);
        }

        canvas.line(Point::new(rect.x0, rect.y0), Point::new(rect.x0, rect.y1), stroke);
        for tick in frame.y.ticks() {
            let y = frame.y.to_screen(tick.value);
            canvas.line(Point::new(rect.x0 - length, y), Point::new(rect.x0, y), stroke);
        }
    }
}

/// Tick labels drawn just inside the bottom and left edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickLabels;

impl PlotElement for TickLabels {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let rect = frame.rect;
        let theme = frame.theme;

        for tick in frame.x.ticks() {
            let at = Point::new(frame.x.to_screen(tick.value), rect.y1 - LABEL_PADDING);
            canvas.text(at, tick.label.as_str(), Anchor::Middle, theme.font_size, theme.text);
        }
        for tick in frame.y.ticks() {
            let at = Point::new(rect.x0 + LABEL_PADDING, frame.y.to_screen(tick.value) - LABEL_PADDING);
            canvas.text(at, tick.label.as_str(), Anchor::Start, theme.font_size, theme.text);
        }
    }
}

/// A series drawn as connected points, in the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    label: String,
    points: Vec<Point>,
    stroke: Option<Stroke>,
}

impl Line {
    /// Creates a line through `points`.
    pub fn new(label: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            label: label.into(),
            points,
            stroke: None,
        }
    }

    /// A line of `values` against their index.
    pub fn from_values<T: ToPrimitive>(label: impl Into<String>, values: &[T]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(i as f64, v.to_f64().unwrap_or(f64::NAN)))
            .collect();
        Self::new(label, points)
    }

    /// Draw with `stroke` instead of the theme's series stroke.
    pub const fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Series name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Data-space points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl PlotElement for Line {
    fn data_bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let stroke = self.stroke.unwrap_or(frame.theme.series);
        canvas.polyline(frame.project_all(&self.points), stroke);
    }
}

/// Kernel density estimate of a sample, drawn as a curve over a filled area.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    label: String,
    estimate: DensityEstimate,
    stroke: Option<Stroke>,
}

impl Density {
    /// Estimates the density of `values` at the default resolution.
    pub fn new<T: ToPrimitive>(label: impl Into<String>, values: &[T]) -> LapResult<Self> {
        Self::with_resolution(label, values, DEFAULT_RESOLUTION)
    }

    /// Estimates the density of `values` at `resolution` evenly spaced points.
    pub fn with_resolution<T: ToPrimitive>(
        label: impl Into<String>,
        values: &[T],
        resolution: usize,
    ) -> LapResult<Self> {
        let estimate = kernel_density(&to_f64_values(values), resolution)?;
        Ok(Self {
            label: label.into(),
            estimate,
            stroke: None,
        })
    }

    /// Draw with `stroke` instead of the theme's series stroke.
    pub const fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Series name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The underlying estimate.
    pub const fn estimate(&self) -> &DensityEstimate {
        &self.estimate
    }

    fn data_points(&self) -> Vec<Point> {
        self.estimate
            .points
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect()
    }
}

impl PlotElement for Density {
    fn data_bounds(&self) -> Option<Bounds> {
        let x = Range::from_values(self.estimate.points.iter().map(|&(x, _)| x))?;
        Some(Bounds::new(x, Range::new(0.0, self.estimate.peak())))
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let curve = frame.project_all(&self.data_points());

        if let (Some(fill), Some(first), Some(last)) =
            (frame.theme.fill, self.estimate.points.first(), self.estimate.points.last())
        {
            let mut area = curve.clone();
            area.push(frame.project(Point::new(last.0, 0.0)));
            area.push(frame.project(Point::new(first.0, 0.0)));
            canvas.polygon(area, fill);
        }

        canvas.polyline(curve, self.stroke.unwrap_or(frame.theme.series));
    }
}

/// Percentile curve of a sample: percentile along x, value along y.
///
/// Pair with a percentile x axis to stretch the tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Percentiles {
    label: String,
    curve: PercentileCurve,
    stroke: Option<Stroke>,
}

impl Percentiles {
    /// Computes the percentile curve of `values`.
    pub fn new<T: ToPrimitive>(label: impl Into<String>, values: &[T]) -> LapResult<Self> {
        let curve = PercentileCurve::from_values(&to_f64_values(values))?;
        Ok(Self {
            label: label.into(),
            curve,
            stroke: None,
        })
    }

    /// Draw with `stroke` instead of the theme's series stroke.
    pub const fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Series name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The underlying curve.
    pub const fn curve(&self) -> &PercentileCurve {
        &self.curve
    }
}

impl PlotElement for Percentiles {
    fn data_bounds(&self) -> Option<Bounds> {
        let y = Range::from_values(self.curve.points.iter().map(|&(_, v)| v))?;
        Some(Bounds::new(Range::new(0.0, MAX_PERCENTILE), y))
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        let points: Vec<Point> = self
            .curve
            .points
            .iter()
            .map(|&(p, v)| frame.project(Point::new(p, v)))
            .filter(Point::is_finite)
            .collect();
        canvas.polyline(points, self.stroke.unwrap_or(frame.theme.series));
    }
}
