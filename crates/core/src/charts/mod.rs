//! Small plotting library rendering figures to SVG.
//!
//! Covers what the catalog needs for its dashboard and demo plots: line,
//! scatter and histogram panels laid out on a subplot grid, with titles,
//! axis labels, legends and an optional figure-level title.
//!
//! ```
//! use silk_saree_core::charts::{Color, Figure};
//!
//! let mut figure = Figure::new(1, 1);
//! let axes = figure.subplot(1, 1, 1).unwrap();
//! axes.set_title("Speed");
//! axes.scatter(&[1.0, 2.0], &[3.0, 4.0])
//!     .unwrap()
//!     .color(Color::BLUE)
//!     .label("Day 1");
//! axes.legend();
//!
//! let svg = figure.to_svg();
//! assert!(svg.starts_with("<svg"));
//! ```

mod color;
mod figure;
mod histogram;
mod scale;
mod svg;

pub use color::Color;
pub use figure::{Axes, Bar, Figure, Series, SeriesData, SuperTitle, Tick};
pub use histogram::Histogram;
pub use scale::{LinearScale, format_tick, nice_ticks};

/// Errors raised while building a figure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("histogram needs at least two bin edges")]
    TooFewEdges,
    #[error("histogram bin edges must be strictly increasing")]
    EdgesNotIncreasing,
    #[error("histogram needs at least one finite value")]
    NoData,
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("subplot grid {rows}x{cols} does not match the figure")]
    GridMismatch { rows: usize, cols: usize },
    #[error("subplot index {index} is outside 1..={count}")]
    SubplotOutOfRange { index: usize, count: usize },
    #[error("unknown colour: {0}")]
    UnknownColor(String),
}
