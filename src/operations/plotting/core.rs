//! Core types and traits for the composable plotting system.
//!
//! Geometry lives in two spaces: data space (the values being plotted) and
//! pixel space (canvas coordinates, `y` growing downwards). A [`Frame`] ties a
//! pixel rectangle to one resolved axis per direction and is handed to every
//! element when it is drawn.

use std::fmt;

use super::axis::ResolvedAxis;
use super::canvas::Canvas;

/// A point in data or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

impl Range {
    /// Creates a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest range containing every finite value, or `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Range>, v| {
                Some(match acc {
                    Some(r) => Range::new(r.min.min(v), r.max.max(v)),
                    None => Range::new(v, v),
                })
            })
    }

    /// Smallest range containing both ranges.
    pub fn union(self, other: Range) -> Range {
        Range::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// `max - min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Data-space bounds of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Horizontal extent.
    pub x: Range,
    /// Vertical extent.
    pub y: Range,
}

impl Bounds {
    /// Creates bounds from two ranges.
    pub const fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Bounds of the finite points, or `None` if there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let finite = || points.iter().filter(|p| p.is_finite());
        Some(Self {
            x: Range::from_values(finite().map(|p| p.x))?,
            y: Range::from_values(finite().map(|p| p.y))?,
        })
    }

    /// Smallest bounds containing both.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(self.x.union(other.x), self.y.union(other.y))
    }

    /// Union of optional bounds, ignoring missing ones.
    pub fn union_all(bounds: impl IntoIterator<Item = Option<Bounds>>) -> Option<Bounds> {
        bounds
            .into_iter()
            .flatten()
            .reduce(Bounds::union)
    }
}

/// Space around a drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Margin {
    /// Space above.
    pub top: f64,
    /// Space to the right.
    pub right: f64,
    /// Space below.
    pub bottom: f64,
    /// Space to the left.
    pub left: f64,
}

impl Margin {
    /// No margin.
    pub const ZERO: Margin = Margin::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a margin from `(top, right, bottom, left)`.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// `left + right`.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An axis-aligned pixel rectangle from `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge.
    pub y1: f64,
}

impl Rect {
    /// Creates a rectangle from its edges.
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A rectangle at the origin with the given size.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The rectangle shrunk by `margin`. Never inverts; an over-large margin
    /// collapses the rectangle to a line.
    pub fn inset(&self, margin: Margin) -> Rect {
        let x0 = (self.x0 + margin.left).min(self.x1);
        let y0 = (self.y0 + margin.top).min(self.y1);
        let x1 = (self.x1 - margin.right).max(x0);
        let y1 = (self.y1 - margin.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// An opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// The same colour with opacity `a`.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style of a stroked line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    /// Line colour.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}

impl Stroke {
    /// Creates a stroke.
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Visual defaults shared by every element of a plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Theme {
    /// Canvas background, if any.
    pub background: Option<Color>,
    /// Frame drawn by the gizmo.
    pub frame: Stroke,
    /// Grid lines.
    pub grid: Stroke,
    /// Axis lines and tick marks.
    pub axis: Stroke,
    /// Data series.
    pub series: Stroke,
    /// Area under density curves, if any.
    pub fill: Option<Color>,
    /// Tick label colour.
    pub text: Color,
    /// Tick label size in pixels.
    pub font_size: f64,
    /// Length of axis tick marks in pixels.
    pub tick_length: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Some(Color::rgb(0xff, 0xff, 0xff)),
            frame: Stroke::new(Color::rgb(0x33, 0x33, 0x33), 1.0),
            grid: Stroke::new(Color::rgb(0xdc, 0xdc, 0xdc), 0.5),
            axis: Stroke::new(Color::rgb(0x33, 0x33, 0x33), 1.0),
            series: Stroke::new(Color::rgb(0x1f, 0x77, 0xb4), 1.5),
            fill: Some(Color::rgb(0x1f, 0x77, 0xb4).with_alpha(0x40)),
            text: Color::rgb(0x33, 0x33, 0x33),
            font_size: 10.0,
            tick_length: 4.0,
        }
    }
}

impl Theme {
    /// A theme without background or fills, for overlays.
    pub fn transparent() -> Self {
        Self {
            background: None,
            fill: None,
            ..Self::default()
        }
    }

    /// Set the series stroke.
    pub const fn with_series(mut self, stroke: Stroke) -> Self {
        self.series = stroke;
        self
    }

    /// Set the tick label size.
    pub const fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }
}

/// A pixel rectangle with its resolved coordinate transform.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// Drawing area in pixels.
    pub rect: Rect,
    /// Horizontal transform.
    pub x: ResolvedAxis,
    /// Vertical transform.
    pub y: ResolvedAxis,
    /// Shared visual defaults.
    pub theme: &'a Theme,
}

impl Frame<'_> {
    /// Maps a data-space point to pixel space.
    pub fn project(&self, point: Point) -> Point {
        Point::new(self.x.to_screen(point.x), self.y.to_screen(point.y))
    }

    /// Maps every finite data-space point to pixel space.
    pub fn project_all(&self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .filter(|p| p.is_finite())
            .map(|&p| self.project(p))
            .collect()
    }
}

/// Core trait for everything that can live in a plot tree.
pub trait PlotElement {
    /// Data-space bounds this element contributes to its group's transform.
    ///
    /// Decorations and nested coordinate systems contribute nothing.
    fn data_bounds(&self) -> Option<Bounds>;

    /// Appends this element's drawing commands to `canvas`.
    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_from_values_skips_non_finite() {
        let range = Range::from_values([3.0, f64::NAN, -1.0, f64::INFINITY, 2.0]).unwrap();
        assert_eq!(range, Range::new(-1.0, 3.0));
        assert!(Range::from_values(std::iter::empty()).is_none());
        assert!(Range::from_values([f64::NAN]).is_none());
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(Range::new(0.0, 1.0), Range::new(5.0, 6.0));
        let b = Bounds::new(Range::new(-1.0, 0.5), Range::new(5.5, 9.0));
        let all = Bounds::union_all([Some(a), None, Some(b)]).unwrap();
        assert_eq!(all, Bounds::new(Range::new(-1.0, 1.0), Range::new(5.0, 9.0)));
        assert!(Bounds::union_all([None::<Bounds>, None]).is_none());
    }

    #[test]
    fn test_rect_inset() {
        let rect = Rect::from_size(800.0, 300.0);
        let inner = rect.inset(Margin::new(5.0, 0.0, 0.0, 5.0));
        assert_eq!(inner, Rect::new(5.0, 5.0, 800.0, 300.0));

        let collapsed = Rect::from_size(10.0, 10.0).inset(Margin::uniform(20.0));
        assert_eq!(collapsed.width(), 0.0);
        assert_eq!(collapsed.height(), 0.0);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgb(0x1f, 0x77, 0xb4).to_string(), "#1f77b4");
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(0).opacity(), 0.0);
    }
}
