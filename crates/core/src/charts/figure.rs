//! Figure, panel and series model.

use super::scale::{format_tick, nice_ticks};
use super::{ChartError, Color, Histogram};

/// One bar of a bar series, spanning `[x0, x1]` from zero to `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
}

/// The data of a series, by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// Points joined in the given order.
    Line(Vec<(f64, f64)>),
    /// Unconnected markers.
    Scatter(Vec<(f64, f64)>),
    /// Filled bars, e.g. histogram bins.
    Bars(Vec<Bar>),
}

/// A data series drawn on an [`Axes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub data: SeriesData,
    pub color: Option<Color>,
    pub label: Option<String>,
}

impl Series {
    /// Set the series colour.
    pub const fn color(&mut self, color: Color) -> &mut Self {
        self.color = Some(color);
        self
    }

    /// Set the legend label.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    fn points(&self) -> Box<dyn Iterator<Item = (f64, f64)> + '_> {
        match &self.data {
            SeriesData::Line(points) | SeriesData::Scatter(points) => {
                Box::new(points.iter().copied())
            }
            SeriesData::Bars(bars) => Box::new(
                bars.iter()
                    .flat_map(|b| [(b.x0, 0.0), (b.x1, b.height)]),
            ),
        }
    }
}

/// An explicit axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Data extent of a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// A single plotting panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_ticks: Option<Vec<Tick>>,
    pub show_legend: bool,
    pub series: Vec<Series>,
}

impl Axes {
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.y_label = Some(label.into());
        self
    }

    /// Use exactly these x tick positions, labelled with their values.
    pub fn set_xticks(&mut self, values: &[f64]) -> &mut Self {
        let step = values
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(f64::INFINITY, f64::min);
        let step = if step.is_finite() { step } else { 1.0 };
        self.x_ticks = Some(
            values
                .iter()
                .map(|v| Tick {
                    value: *v,
                    label: format_tick(*v, step),
                })
                .collect(),
        );
        self
    }

    /// Use these x tick positions with custom labels.
    pub fn set_xticks_labeled<I, S>(&mut self, ticks: I) -> &mut Self
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        self.x_ticks = Some(
            ticks
                .into_iter()
                .map(|(value, label)| Tick {
                    value,
                    label: label.into(),
                })
                .collect(),
        );
        self
    }

    /// Show a legend of labelled series.
    pub const fn legend(&mut self) -> &mut Self {
        self.show_legend = true;
        self
    }

    /// Add a line through `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::LengthMismatch`] if the slices differ in length.
    pub fn plot(&mut self, x: &[f64], y: &[f64]) -> Result<&mut Series, ChartError> {
        let points = zip_points(x, y)?;
        Ok(self.push(SeriesData::Line(points)))
    }

    /// Add unconnected markers at `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::LengthMismatch`] if the slices differ in length.
    pub fn scatter(&mut self, x: &[f64], y: &[f64]) -> Result<&mut Series, ChartError> {
        let points = zip_points(x, y)?;
        Ok(self.push(SeriesData::Scatter(points)))
    }

    /// Add one bar per histogram bin.
    #[allow(clippy::cast_precision_loss)]
    pub fn hist(&mut self, histogram: &Histogram) -> &mut Series {
        let bars = histogram
            .bins()
            .map(|(x0, x1, count)| Bar {
                x0,
                x1,
                height: count as f64,
            })
            .collect();
        self.push(SeriesData::Bars(bars))
    }

    fn push(&mut self, data: SeriesData) -> &mut Series {
        self.series.push(Series {
            data,
            color: None,
            label: None,
        });
        let last = self.series.len() - 1;
        &mut self.series[last]
    }

    /// Data extent including explicit ticks, or `None` for an empty panel.
    pub(super) fn bounds(&self) -> Option<Bounds> {
        let tick_points = self
            .x_ticks
            .iter()
            .flatten()
            .map(|t| (t.value, f64::NAN));
        let mut points = self
            .series
            .iter()
            .flat_map(Series::points)
            .chain(tick_points)
            .filter(|(x, _)| x.is_finite());

        let (x0, y0) = points.next()?;
        let mut bounds = Bounds {
            x: (x0, x0),
            y: (y0, y0),
        };
        for (x, y) in points {
            bounds.x = (bounds.x.0.min(x), bounds.x.1.max(x));
            if y.is_finite() {
                bounds.y = (bounds.y.0.min(y), bounds.y.1.max(y));
            }
        }
        if !bounds.y.0.is_finite() {
            bounds.y = (0.0, 1.0);
        }
        Some(bounds)
    }

    /// Y tick values covering the data.
    pub(super) fn y_ticks(&self) -> Vec<f64> {
        self.bounds()
            .map(|b| nice_ticks(b.y.0, b.y.1, 5))
            .unwrap_or_else(|| nice_ticks(0.0, 1.0, 5))
    }

    /// X ticks: explicit ones if set, otherwise nice values covering the data.
    pub(super) fn resolved_x_ticks(&self) -> Vec<Tick> {
        if let Some(ticks) = &self.x_ticks {
            return ticks.clone();
        }
        let values = self
            .bounds()
            .map(|b| nice_ticks(b.x.0, b.x.1, 5))
            .unwrap_or_else(|| nice_ticks(0.0, 1.0, 5));
        let step = tick_step(&values);
        values
            .into_iter()
            .map(|value| Tick {
                value,
                label: format_tick(value, step),
            })
            .collect()
    }
}

pub(super) fn tick_step(values: &[f64]) -> f64 {
    match values {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    }
}

fn zip_points(x: &[f64], y: &[f64]) -> Result<Vec<(f64, f64)>, ChartError> {
    if x.len() != y.len() {
        return Err(ChartError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    Ok(x.iter().copied().zip(y.iter().copied()).collect())
}

/// A title drawn above all panels.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperTitle {
    pub text: String,
    pub color: Color,
    pub font_size: f64,
}

/// A grid of panels rendered to a single SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    rows: usize,
    cols: usize,
    pub width: f64,
    pub height: f64,
    pub suptitle: Option<SuperTitle>,
    axes: Vec<Axes>,
}

impl Figure {
    /// Create a `rows` x `cols` grid of empty panels (at least 1x1).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            width: (320.0 * cols as f64).max(640.0),
            height: (240.0 * rows as f64).max(480.0),
            suptitle: None,
            axes: vec![Axes::default(); rows * cols],
        }
    }

    /// Override the pixel size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Grid dimensions as `(rows, cols)`.
    #[must_use]
    pub const fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Select a panel by 1-based, row-major `index` in a `rows` x `cols` grid.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::GridMismatch`] if the grid differs from the
    /// figure's and [`ChartError::SubplotOutOfRange`] if `index` is not in
    /// `1..=rows * cols`.
    pub fn subplot(
        &mut self,
        rows: usize,
        cols: usize,
        index: usize,
    ) -> Result<&mut Axes, ChartError> {
        if (rows, cols) != (self.rows, self.cols) {
            return Err(ChartError::GridMismatch { rows, cols });
        }
        let count = self.axes.len();
        index
            .checked_sub(1)
            .and_then(|i| self.axes.get_mut(i))
            .ok_or(ChartError::SubplotOutOfRange { index, count })
    }

    /// Set a title drawn above all panels.
    pub fn set_suptitle(&mut self, text: impl Into<String>, color: Color, font_size: f64) {
        self.suptitle = Some(SuperTitle {
            text: text.into(),
            color,
            font_size,
        });
    }

    /// Panels in row-major order.
    #[must_use]
    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Render the figure as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        super::svg::Svg(self).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subplot_indexing() {
        let mut figure = Figure::new(1, 3);
        figure.subplot(1, 3, 1).unwrap().set_title("plot 1");
        figure.subplot(1, 3, 3).unwrap().set_title("plot 3");

        let titles: Vec<_> = figure.axes().iter().map(|a| a.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("plot 1"), None, Some("plot 3")]);
    }

    #[test]
    fn test_subplot_errors() {
        let mut figure = Figure::new(3, 1);
        assert_eq!(
            figure.subplot(3, 1, 0).unwrap_err(),
            ChartError::SubplotOutOfRange { index: 0, count: 3 }
        );
        assert_eq!(
            figure.subplot(3, 1, 4).unwrap_err(),
            ChartError::SubplotOutOfRange { index: 4, count: 3 }
        );
        assert_eq!(
            figure.subplot(1, 3, 1).unwrap_err(),
            ChartError::GridMismatch { rows: 1, cols: 3 }
        );
    }

    #[test]
    fn test_plot_length_mismatch() {
        let mut axes = Axes::default();
        assert_eq!(
            axes.plot(&[1.0, 2.0], &[1.0]).unwrap_err(),
            ChartError::LengthMismatch { x: 2, y: 1 }
        );
    }

    #[test]
    fn test_bounds_include_bars_baseline_and_ticks() {
        let mut axes = Axes::default();
        let hist = Histogram::with_edges(&[40.0, 50.0], &[35.0, 70.0]).unwrap();
        axes.hist(&hist);
        axes.set_xticks(&[0.0, 35.0, 70.0, 100.0]);

        let bounds = axes.bounds().unwrap();
        assert_eq!(bounds.x, (0.0, 100.0));
        assert_eq!(bounds.y, (0.0, 2.0));
    }

    #[test]
    fn test_explicit_ticks_are_kept() {
        let mut axes = Axes::default();
        axes.set_xticks(&[0.0, 35.0, 70.0, 100.0]);
        let labels: Vec<_> = axes
            .resolved_x_ticks()
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["0", "35", "70", "100"]);
    }
}
