//! Append-only vector canvas with SVG serialization.
//!
//! Drawing appends [`Command`]s in order; nothing already emitted is ever
//! changed. Serialization replays the command list once onto the `plotters`
//! SVG backend, so the same commands always produce byte-identical output.

use plotters::prelude::{DrawingBackend, IntoFont, RGBAColor, SVGBackend, ShapeStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use super::core::{Color, Point, Rect, Stroke};
use crate::{LapError, LapResult};

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at the anchor.
    Start,
    /// Text is centred on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

impl Anchor {
    const fn h_pos(self) -> HPos {
        match self {
            Anchor::Start => HPos::Left,
            Anchor::Middle => HPos::Center,
            Anchor::End => HPos::Right,
        }
    }
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Opens a group of commands.
    BeginGroup,
    /// Closes the innermost open group.
    EndGroup,
    /// Connected line segments.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Line style.
        stroke: Stroke,
    },
    /// A closed filled shape.
    Polygon {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Fill colour.
        fill: Color,
    },
    /// A single line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Line style.
        stroke: Stroke,
    },
    /// A rectangle, stroked and/or filled.
    Rect {
        /// Extent.
        rect: Rect,
        /// Outline, if any.
        stroke: Option<Stroke>,
        /// Fill, if any.
        fill: Option<Color>,
    },
    /// A line of text.
    Text {
        /// Anchor point; the baseline sits at `at.y`.
        at: Point,
        /// Content.
        text: String,
        /// Horizontal alignment.
        anchor: Anchor,
        /// Font size in pixels.
        size: f64,
        /// Text colour.
        color: Color,
    },
}

/// A drawing surface that records commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
    commands: Vec<Command>,
}

impl Canvas {
    /// Creates an empty canvas of `width` by `height` pixels.
    pub fn new(width: f64, height: f64) -> LapResult<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(LapError::invalid_config(
                    name,
                    format!("must be a positive number of pixels, got {value}"),
                ));
            }
        }
        debug!(width, height, "created canvas");
        Ok(Self {
            width,
            height,
            commands: Vec::new(),
        })
    }

    /// Width in pixels.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The whole canvas as a rectangle.
    pub const fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Opens a group; pair with [`Canvas::end_group`].
    pub fn begin_group(&mut self) {
        self.commands.push(Command::BeginGroup);
    }

    /// Closes the innermost open group.
    pub fn end_group(&mut self) {
        self.commands.push(Command::EndGroup);
    }

    /// Draws connected segments through `points`. Fewer than two points draw nothing.
    pub fn polyline(&mut self, points: Vec<Point>, stroke: Stroke) {
        if points.len() >= 2 {
            self.commands.push(Command::Polyline { points, stroke });
        }
    }

    /// Fills the shape outlined by `points`. Fewer than three points draw nothing.
    pub fn polygon(&mut self, points: Vec<Point>, fill: Color) {
        if points.len() >= 3 {
            self.commands.push(Command::Polygon { points, fill });
        }
    }

    /// Draws a line segment.
    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.commands.push(Command::Line { from, to, stroke });
    }

    /// Draws a rectangle.
    pub fn rect_shape(&mut self, rect: Rect, stroke: Option<Stroke>, fill: Option<Color>) {
        self.commands.push(Command::Rect { rect, stroke, fill });
    }

    /// Draws text.
    pub fn text(&mut self, at: Point, text: impl Into<String>, anchor: Anchor, size: f64, color: Color) {
        self.commands.push(Command::Text {
            at,
            text: text.into(),
            anchor,
            size,
            color,
        });
    }

    /// Serializes the canvas as an SVG document.
    ///
    /// Commands are replayed in order onto a `plotters` SVG backend sized to
    /// the canvas, rounded up to whole pixels. Group markers only structure
    /// the command log; the document itself is flat.
    pub fn to_svg(&self) -> LapResult<String> {
        let size = (pixels(self.width), pixels(self.height));
        let mut svg = String::new();
        {
            let mut backend = SVGBackend::with_string(&mut svg, size);
            for command in &self.commands {
                replay(&mut backend, command)?;
            }
            backend.present().map_err(LapError::render)?;
        }
        Ok(svg)
    }

    /// Serializes the canvas as SVG bytes.
    pub fn to_bytes(&self) -> LapResult<Vec<u8>> {
        Ok(self.to_svg()?.into_bytes())
    }
}

fn replay<DB: DrawingBackend>(backend: &mut DB, command: &Command) -> LapResult<()> {
    match command {
        Command::BeginGroup | Command::EndGroup => Ok(()),
        Command::Polyline { points, stroke } => backend
            .draw_path(points.iter().map(|&p| coord(p)), &stroke_style(stroke))
            .map_err(LapError::render),
        Command::Polygon { points, fill } => backend
            .fill_polygon(points.iter().map(|&p| coord(p)), &fill_style(*fill))
            .map_err(LapError::render),
        Command::Line { from, to, stroke } => backend
            .draw_line(coord(*from), coord(*to), &stroke_style(stroke))
            .map_err(LapError::render),
        Command::Rect { rect, stroke, fill } => {
            let (upper_left, bottom_right) = (
                coord(Point::new(rect.x0, rect.y0)),
                coord(Point::new(rect.x1, rect.y1)),
            );
            if let Some(fill) = fill {
                backend
                    .draw_rect(upper_left, bottom_right, &fill_style(*fill), true)
                    .map_err(LapError::render)?;
            }
            if let Some(stroke) = stroke {
                backend
                    .draw_rect(upper_left, bottom_right, &stroke_style(stroke), false)
                    .map_err(LapError::render)?;
            }
            Ok(())
        }
        Command::Text {
            at,
            text,
            anchor,
            size,
            color,
        } => {
            let style = ("sans-serif", *size)
                .into_font()
                .color(&rgba(*color))
                .pos(Pos::new(anchor.h_pos(), VPos::Bottom));
            backend
                .draw_text(text, &style, coord(*at))
                .map_err(LapError::render)
        }
    }
}

fn pixels(extent: f64) -> u32 {
    extent.ceil() as u32
}

fn coord(point: Point) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}

fn rgba(color: Color) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.opacity())
}

fn stroke_style(stroke: &Stroke) -> ShapeStyle {
    ShapeStyle {
        color: rgba(stroke.color),
        filled: false,
        stroke_width: stroke.width.round().max(1.0) as u32,
    }
}

fn fill_style(fill: Color) -> ShapeStyle {
    ShapeStyle {
        color: rgba(fill),
        filled: true,
        stroke_width: 0,
    }
}
