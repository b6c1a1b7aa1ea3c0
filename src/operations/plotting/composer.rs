//! Plot tree composition, layout and rendering.
//!
//! A [`Plot`] owns a root [`Group`]. Each group resolves one coordinate
//! system from the union of its own series' bounds and hands it to every
//! child as a [`Frame`]. A [`Stack`] splits its area into bands and gives one
//! band to each of its groups.
//!
//! ```rust
//! use lap_samples::plotting::{Axis, Density, Gizmo, Grid, Group, Margin, Percentiles, Plot, Stack, TickLabels};
//!
//! let seconds = [0.0011, 0.0012, 0.0010, 0.0031, 0.0012];
//! let density = Group::new()
//!     .add(Grid)
//!     .add(Density::new("density", &seconds).unwrap())
//!     .add(TickLabels);
//! let percentiles = Group::new()
//!     .with_x_axis(Axis::percentile())
//!     .add(Gizmo)
//!     .add(Percentiles::new("percentiles", &seconds).unwrap());
//!
//! let stack = Stack::vertical()
//!     .with_margin(Margin::uniform(5.0))
//!     .add(density)
//!     .add(percentiles);
//! let svg = Plot::new().add(stack).render_svg(800.0, 600.0).unwrap();
//! assert!(svg.starts_with(b"<svg"));
//! ```

use tracing::{debug, trace};

use super::axis::Axis;
use super::canvas::Canvas;
use super::core::{Bounds, Frame, Margin, PlotElement, Rect, Theme};
use super::elements::{AxisLines, Density, Gizmo, Grid, Line, Percentiles, TickLabels};
use crate::{LapError, LapResult};

/// Any node of the plot tree.
#[derive(Debug, Clone)]
pub enum Element {
    /// Grid lines at every tick.
    Grid(Grid),
    /// Border around the data area.
    Gizmo(Gizmo),
    /// Baselines with tick marks.
    Axis(AxisLines),
    /// Tick labels.
    TickLabels(TickLabels),
    /// Connected points.
    Line(Line),
    /// Kernel density estimate.
    Density(Density),
    /// Percentile curve.
    Percentiles(Percentiles),
    /// A nested coordinate system.
    Group(Group),
    /// Groups laid out side by side.
    Stack(Stack),
}

macro_rules! element_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(element: $ty) -> Self {
                    Element::$variant(element)
                }
            }
        )*
    };
}

element_from!(
    Grid(Grid),
    Gizmo(Gizmo),
    Axis(AxisLines),
    TickLabels(TickLabels),
    Line(Line),
    Density(Density),
    Percentiles(Percentiles),
    Group(Group),
    Stack(Stack),
);

impl PlotElement for Element {
    fn data_bounds(&self) -> Option<Bounds> {
        match self {
            Element::Grid(e) => e.data_bounds(),
            Element::Gizmo(e) => e.data_bounds(),
            Element::Axis(e) => e.data_bounds(),
            Element::TickLabels(e) => e.data_bounds(),
            Element::Line(e) => e.data_bounds(),
            Element::Density(e) => e.data_bounds(),
            Element::Percentiles(e) => e.data_bounds(),
            Element::Group(e) => e.data_bounds(),
            Element::Stack(e) => e.data_bounds(),
        }
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        match self {
            Element::Grid(e) => e.draw(canvas, frame),
            Element::Gizmo(e) => e.draw(canvas, frame),
            Element::Axis(e) => e.draw(canvas, frame),
            Element::TickLabels(e) => e.draw(canvas, frame),
            Element::Line(e) => e.draw(canvas, frame),
            Element::Density(e) => e.draw(canvas, frame),
            Element::Percentiles(e) => e.draw(canvas, frame),
            Element::Group(e) => e.draw(canvas, frame),
            Element::Stack(e) => e.draw(canvas, frame),
        }
    }
}

/// Children sharing one coordinate system.
///
/// Children are drawn in insertion order, so later ones overlay earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Group {
    x: Axis,
    y: Axis,
    margin: Margin,
    children: Vec<Element>,
}

impl Group {
    /// An empty group with linear axes and no margin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis.
    pub const fn with_x_axis(mut self, axis: Axis) -> Self {
        self.x = axis;
        self
    }

    /// Set the vertical axis.
    pub const fn with_y_axis(mut self, axis: Axis) -> Self {
        self.y = axis;
        self
    }

    /// Set the space kept free around the data area.
    pub const fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Append a child.
    pub fn add(mut self, child: impl Into<Element>) -> Self {
        self.push(child);
        self
    }

    /// Append a child in place.
    pub fn push(&mut self, child: impl Into<Element>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    /// Children in drawing order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Union of the bounds of this group's own series.
    ///
    /// Nested groups and stacks keep their own coordinate systems and do not
    /// contribute.
    pub fn series_bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.children.iter().map(PlotElement::data_bounds))
    }

    /// Resolves the coordinate system for drawing into `rect`, after the
    /// group's margin has been taken off.
    pub fn resolve<'a>(&self, rect: Rect, theme: &'a Theme) -> Frame<'a> {
        let rect = rect.inset(self.margin);
        let bounds = self.series_bounds();
        Frame {
            rect,
            x: self.x.resolve(bounds.map(|b| b.x), rect.x0, rect.x1),
            y: self.y.resolve(bounds.map(|b| b.y), rect.y1, rect.y0),
            theme,
        }
    }

    /// Draws the group and its children into `rect`.
    pub fn draw_in(&self, canvas: &mut Canvas, rect: Rect, theme: &Theme) {
        let frame = self.resolve(rect, theme);
        canvas.begin_group();
        for child in &self.children {
            child.draw(canvas, &frame);
        }
        canvas.end_group();
    }
}

impl PlotElement for Group {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        self.draw_in(canvas, frame.rect, frame.theme);
    }
}

/// Axis along which a [`Stack`] places its groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
}

/// Groups laid out in non-overlapping bands along one direction.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    direction: Direction,
    margin: Margin,
    children: Vec<(Group, f64)>,
}

impl Stack {
    /// A stack that places groups top to bottom.
    pub fn vertical() -> Self {
        Self::default()
    }

    /// A stack that places groups left to right.
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Self::default()
        }
    }

    /// Set the space removed from the stack's area before it is split.
    pub const fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Append a group with weight 1.
    pub fn add(mut self, group: Group) -> Self {
        self.children.push((group, 1.0));
        self
    }

    /// Append a group whose band is `weight` times as large as a weight-1 band.
    pub fn add_weighted(mut self, group: Group, weight: f64) -> LapResult<Self> {
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(LapError::invalid_config(
                "weight",
                format!("must be a positive finite number, got {weight}"),
            ));
        }
        self.children.push((group, weight));
        Ok(self)
    }

    /// Layout direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the stack holds no groups.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Splits `rect`, minus the margin, into one band per group.
    ///
    /// Bands are contiguous, proportional to their weights and together cover
    /// the whole inner area.
    pub fn layout(&self, rect: Rect) -> Vec<Rect> {
        let inner = rect.inset(self.margin);
        let total: f64 = self.children.iter().map(|(_, w)| w).sum();
        let (start, end) = match self.direction {
            Direction::Vertical => (inner.y0, inner.y1),
            Direction::Horizontal => (inner.x0, inner.x1),
        };
        let extent = end - start;

        let mut cumulative = 0.0;
        let last = self.children.len().saturating_sub(1);
        let bands: Vec<Rect> = self
            .children
            .iter()
            .enumerate()
            .map(|(i, (_, weight))| {
                let from = start + extent * cumulative / total;
                cumulative += weight;
                let to = if i == last {
                    end
                } else {
                    start + extent * cumulative / total
                };
                match self.direction {
                    Direction::Vertical => Rect::new(inner.x0, from, inner.x1, to),
                    Direction::Horizontal => Rect::new(from, inner.y0, to, inner.y1),
                }
            })
            .collect();

        trace!(direction = ?self.direction, bands = bands.len(), extent, "stack layout");
        bands
    }
}

impl PlotElement for Stack {
    fn data_bounds(&self) -> Option<Bounds> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, frame: &Frame<'_>) {
        for ((group, _), band) in self.children.iter().zip(self.layout(frame.rect)) {
            group.draw_in(canvas, band, frame.theme);
        }
    }
}

/// The root of a plot tree together with its theme.
#[derive(Debug, Clone, Default)]
pub struct Plot {
    root: Group,
    theme: Theme,
}

impl Plot {
    /// An empty plot with the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the root group's horizontal axis.
    pub fn with_x_axis(mut self, axis: Axis) -> Self {
        self.root = self.root.with_x_axis(axis);
        self
    }

    /// Set the root group's vertical axis.
    pub fn with_y_axis(mut self, axis: Axis) -> Self {
        self.root = self.root.with_y_axis(axis);
        self
    }

    /// Set the root group's margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.root = self.root.with_margin(margin);
        self
    }

    /// Append a child to the root group.
    pub fn add(mut self, child: impl Into<Element>) -> Self {
        self.root.push(child);
        self
    }

    /// The root group.
    pub const fn root(&self) -> &Group {
        &self.root
    }

    /// The theme.
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Bounds of the root group's series.
    pub fn data_bounds(&self) -> Option<Bounds> {
        self.root.series_bounds()
    }

    /// Draws the whole tree onto `canvas`.
    pub fn draw(&self, canvas: &mut Canvas) {
        let rect = canvas.rect();
        if let Some(background) = self.theme.background {
            canvas.rect_shape(rect, None, Some(background));
        }
        self.root.draw_in(canvas, rect, &self.theme);
        debug!(commands = canvas.commands().len(), "plot drawn");
    }

    /// Draws the tree onto a new canvas of the given size.
    pub fn render(&self, width: f64, height: f64) -> LapResult<Canvas> {
        let mut canvas = Canvas::new(width, height)?;
        self.draw(&mut canvas);
        Ok(canvas)
    }

    /// Renders the tree and serializes it as SVG bytes.
    pub fn render_svg(&self, width: f64, height: f64) -> LapResult<Vec<u8>> {
        self.render(width, height)?.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::plotting::canvas::Command;
    use crate::operations::plotting::core::{Point, Range};
    use approx_eq::assert_approx_eq;

    fn line(points: &[(f64, f64)]) -> Line {
        Line::new("line", points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn test_group_bounds_are_union_of_series() {
        let group = Group::new()
            .add(Grid)
            .add(line(&[(0.0, 1.0), (1.0, 2.0)]))
            .add(line(&[(-1.0, 5.0), (3.0, 0.5)]))
            .add(Group::new().add(line(&[(100.0, 100.0)])));

        let bounds = group.series_bounds().unwrap();
        assert_eq!(bounds, Bounds::new(Range::new(-1.0, 3.0), Range::new(0.5, 5.0)));
        // Computing twice gives the same answer
        assert_eq!(group.series_bounds(), Some(bounds));
        assert!(group.data_bounds().is_none());
    }

    #[test]
    fn test_children_share_one_frame() {
        let group = Group::new()
            .with_margin(Margin::uniform(10.0))
            .add(line(&[(0.0, 0.0), (1.0, 1.0)]))
            .add(line(&[(0.0, 1.0), (1.0, 0.0)]));
        let theme = Theme::transparent();
        let frame = group.resolve(Rect::from_size(120.0, 120.0), &theme);
        assert_eq!(frame.rect, Rect::new(10.0, 10.0, 110.0, 110.0));

        let mut canvas = Canvas::new(120.0, 120.0).unwrap();
        let rect = canvas.rect();
        group.draw_in(&mut canvas, rect, &theme);
        let polylines: Vec<&Vec<Point>> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(polylines.len(), 2);
        // Both diagonals span the same corners of the data area
        assert_eq!(polylines[0][0], Point::new(10.0, 110.0));
        assert_eq!(polylines[0][1], Point::new(110.0, 10.0));
        assert_eq!(polylines[1][0], Point::new(10.0, 10.0));
        assert_eq!(polylines[1][1], Point::new(110.0, 110.0));
        assert_eq!(canvas.commands().first(), Some(&Command::BeginGroup));
        assert_eq!(canvas.commands().last(), Some(&Command::EndGroup));
    }

    #[test]
    fn test_stack_bands_do_not_overlap() {
        let stack = Stack::vertical()
            .with_margin(Margin::uniform(5.0))
            .add(Group::new())
            .add(Group::new())
            .add(Group::new());
        let bands = stack.layout(Rect::from_size(800.0, 600.0));

        assert_eq!(bands.len(), 3);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].y1, pair[1].y0);
        }
        let heights: f64 = bands.iter().map(Rect::height).sum();
        assert_approx_eq!(heights + 5.0 + 5.0, 600.0, 1e-12);
        assert!(bands.iter().all(|b| b.x0 == 5.0 && b.x1 == 795.0));
    }

    #[test]
    fn test_weighted_horizontal_stack() {
        let stack = Stack::horizontal()
            .add(Group::new())
            .add_weighted(Group::new(), 3.0)
            .unwrap();
        let bands = stack.layout(Rect::from_size(400.0, 100.0));
        assert_eq!(bands[0], Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(bands[1], Rect::new(100.0, 0.0, 400.0, 100.0));

        assert!(Stack::vertical().add_weighted(Group::new(), 0.0).is_err());
        assert!(Stack::vertical().add_weighted(Group::new(), f64::NAN).is_err());
        assert!(Stack::vertical().layout(Rect::from_size(10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let build = || {
            Plot::new()
                .with_margin(Margin::new(5.0, 5.0, 5.0, 5.0))
                .add(
                    Stack::vertical()
                        .add(Group::new().add(Grid).add(Line::from_values("timing", &values)))
                        .add(
                            Group::new()
                                .add(Density::new("density", &values).unwrap())
                                .add(TickLabels),
                        )
                        .add(
                            Group::new()
                                .with_x_axis(Axis::percentile())
                                .add(AxisLines)
                                .add(TickLabels)
                                .add(Percentiles::new("percentiles", &values).unwrap()),
                        ),
                )
        };

        let first = build().render_svg(800.0, 600.0).unwrap();
        let second = build().render_svg(800.0, 600.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(build().render_svg(800.0, 600.0).unwrap(), first);

        let canvas = build().render(800.0, 600.0).unwrap();
        let count = |wanted: &Command| canvas.commands().iter().filter(|&c| c == wanted).count();
        // Root group plus one per stacked group
        assert_eq!(count(&Command::BeginGroup), 4);
        assert_eq!(count(&Command::EndGroup), 4);

        let svg = String::from_utf8(first).unwrap();
        assert!(svg.contains(">99.9%</text>"));
    }

    #[test]
    fn test_background_is_drawn_first() {
        let canvas = Plot::new().render(10.0, 10.0).unwrap();
        assert!(matches!(
            canvas.commands().first(),
            Some(Command::Rect { fill: Some(_), .. })
        ));

        let canvas = Plot::new()
            .with_theme(Theme::transparent())
            .render(10.0, 10.0)
            .unwrap();
        assert_eq!(canvas.commands(), &[Command::BeginGroup, Command::EndGroup]);
        assert!(Plot::new().render_svg(0.0, 10.0).is_err());
    }
}
