//! Composable plotting of latency samples to SVG.
//!
//! A plot is a tree: a [`Plot`] owns a root [`Group`], groups own elements,
//! and a [`Stack`] owns groups laid out in bands. Rendering happens in two
//! passes over the tree. Bounds are collected bottom-up from the series of
//! each group, then each group resolves its axes against its pixel area and
//! draws its children into an append-only [`Canvas`].
//!
//! # Quick Start
//!
//! ```rust
//! use lap_samples::plotting::*;
//!
//! # fn example() -> lap_samples::LapResult<()> {
//! let seconds = vec![0.0021, 0.0019, 0.0020, 0.0048, 0.0022, 0.0020];
//!
//! let plot = Plot::new()
//!     .with_margin(Margin::uniform(5.0))
//!     .add(Grid)
//!     .add(Gizmo)
//!     .add(Line::new("timing", points(None, &seconds)?))
//!     .add(TickLabels);
//!
//! let svg: Vec<u8> = plot.render_svg(800.0, 300.0)?;
//! assert!(!svg.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - **PlotElement trait**: the `{data_bounds, draw}` capability every node has
//! - **Elements**: series (line, density, percentiles) and decorations
//!   (grid, gizmo, axis lines, tick labels)
//! - **Composer**: groups, stacks and the plot root
//! - **Axis**: linear and percentile transforms with tick placement
//! - **Canvas**: the command log and its SVG serialization

pub mod axis;
pub mod canvas;
pub mod composer;
pub mod core;
pub mod elements;

pub use axis::{Axis, AxisKind, ResolvedAxis, Tick, tail_stretch};
pub use canvas::{Anchor, Canvas, Command};
pub use composer::{Direction, Element, Group, Plot, Stack};
pub use self::core::*;
pub use elements::*;
