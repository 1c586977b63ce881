//! Render the demo plots to SVG.

use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;

use silk_saree_core::charts::{ChartError, Color, Figure, Histogram};

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartCommandError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Could not write chart: {0}")]
    Io(#[from] std::io::Error),
}

/// The demo charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Age vs speed for two days, with a legend
    Scatter,
    /// Three line plots side by side under a red super title
    Subplots,
    /// Student grades binned into grade intervals
    Histogram,
    /// sin, cos and identity stacked vertically
    Trig,
}

/// Build the figure for `kind`.
///
/// # Errors
///
/// Returns a [`ChartError`] if the figure cannot be assembled.
pub fn build(kind: ChartKind) -> Result<Figure, ChartError> {
    match kind {
        ChartKind::Scatter => scatter(),
        ChartKind::Subplots => subplots(),
        ChartKind::Histogram => histogram(),
        ChartKind::Trig => trig(),
    }
}

/// Render `kind` and write it to `output`.
pub fn render(kind: ChartKind, output: &Path) -> Result<(), ChartCommandError> {
    let svg = build(kind)?.to_svg();
    std::fs::write(output, svg)?;
    tracing::info!(chart = ?kind, path = %output.display(), "Chart written");
    Ok(())
}

fn scatter() -> Result<Figure, ChartError> {
    let mut figure = Figure::new(1, 1);
    let axes = figure.subplot(1, 1, 1)?;

    let day1_age = [25., 27., 28., 27., 22., 17., 32., 39., 44., 22., 32., 49., 61.];
    let day1_speed = [99., 86., 87., 88., 111., 86., 103., 87., 94., 78., 77., 85., 86.];
    axes.scatter(&day1_age, &day1_speed)?
        .color(Color::BLUE)
        .label("Day 1");

    let day2_age = [
        22., 34., 58., 21., 15., 48., 12., 39., 27., 43., 11., 34., 27., 14., 12.,
    ];
    let day2_speed = [
        100., 105., 84., 105., 90., 99., 90., 95., 94., 100., 79., 112., 91., 80., 85.,
    ];
    axes.scatter(&day2_age, &day2_speed)?
        .color(Color::RED)
        .label("Day 2");

    axes.set_xlabel("Age").set_ylabel("Speed").legend();
    Ok(figure)
}

fn subplots() -> Result<Figure, ChartError> {
    let panels: [(&str, [f64; 4], [f64; 4]); 3] = [
        ("plot 1", [4., 1., 2., 3.], [3., 8., 1., 10.]),
        ("plot 2", [2., 1., 2., 3.], [10., 20., 30., 40.]),
        ("plot 3", [3., 4., 2., 8.], [23., 54., 98., 23.]),
    ];

    let mut figure = Figure::new(1, 3).with_size(960.0, 360.0);
    for (index, (title, x, y)) in panels.iter().enumerate() {
        let axes = figure.subplot(1, 3, index + 1)?;
        axes.set_title(*title);
        axes.plot(x, y)?;
    }
    figure.set_suptitle("Subplot", Color::RED, 20.0);
    Ok(figure)
}

fn histogram() -> Result<Figure, ChartError> {
    let marks = [90., 50., 40., 60., 55., 44., 30., 10., 34., 84., 69.];
    let grade_intervals = [0., 35., 70., 100.];
    let bins = Histogram::with_edges(&marks, &grade_intervals)?;

    let mut figure = Figure::new(1, 1);
    let axes = figure.subplot(1, 1, 1)?;
    axes.set_title("Student Grade")
        .set_xlabel("percentage")
        .set_ylabel("No of Students")
        .set_xticks(&grade_intervals);
    axes.hist(&bins).color(Color::RED);
    Ok(figure)
}

fn trig() -> Result<Figure, ChartError> {
    let x: Vec<f64> = (1..10).step_by(2).map(f64::from).collect();
    let sin: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    let cos: Vec<f64> = x.iter().map(|v| v.cos()).collect();
    tracing::debug!(?x, "trig sample points");

    let mut figure = Figure::new(3, 1).with_size(640.0, 720.0);
    figure.subplot(3, 1, 1)?.plot(&x, &sin)?;
    figure.subplot(3, 1, 2)?.plot(&x, &cos)?;
    figure.subplot(3, 1, 3)?.plot(&x, &x)?;
    Ok(figure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chart_renders() {
        for kind in ChartKind::value_variants() {
            let svg = build(*kind).unwrap().to_svg();
            assert!(svg.starts_with("<svg"), "{kind:?}");
            assert!(svg.trim_end().ends_with("</svg>"), "{kind:?}");
        }
    }

    #[test]
    fn test_grid_shapes() {
        assert_eq!(build(ChartKind::Scatter).unwrap().grid(), (1, 1));
        assert_eq!(build(ChartKind::Subplots).unwrap().grid(), (1, 3));
        assert_eq!(build(ChartKind::Trig).unwrap().grid(), (3, 1));
    }

    #[test]
    fn test_subplots_has_red_super_title() {
        let svg = build(ChartKind::Subplots).unwrap().to_svg();
        assert!(svg.contains("Subplot"));
        assert!(svg.contains("#ff0000"));
        assert!(svg.contains("plot 3"));
    }

    #[test]
    fn test_histogram_labels() {
        let svg = build(ChartKind::Histogram).unwrap().to_svg();
        assert!(svg.contains("Student Grade"));
        assert!(svg.contains("No of Students"));
    }
}
