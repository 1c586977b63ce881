//! SVG rendering of a [`Figure`].

use core::fmt::{self, Write};

use super::figure::{Axes, SeriesData, tick_step};
use super::scale::{LinearScale, format_tick};
use super::{Color, Figure};

const FONT: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 44.0;
const TICK_LEN: f64 = 4.0;

/// Display adapter writing a figure as SVG.
pub(super) struct Svg<'a>(pub &'a Figure);

impl fmt::Display for Svg<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let figure = self.0;
        let (rows, cols) = figure.grid();
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="{FONT}">"#,
            w = figure.width,
            h = figure.height,
        )?;
        writeln!(
            f,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            Color::rgb(255, 255, 255)
        )?;

        let header = match &figure.suptitle {
            Some(title) => {
                writeln!(
                    f,
                    r#"<text class="suptitle" x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{:.0}" fill="{}">{}</text>"#,
                    figure.width / 2.0,
                    title.font_size + 6.0,
                    title.font_size,
                    title.color,
                    Escaped(&title.text),
                )?;
                title.font_size + 16.0
            }
            None => 0.0,
        };

        let cell_w = figure.width / cols as f64;
        let cell_h = (figure.height - header) / rows as f64;
        for (i, axes) in figure.axes().iter().enumerate() {
            let cell = Rect {
                x: (i % cols) as f64 * cell_w,
                y: (i / cols) as f64 * cell_h + header,
                w: cell_w,
                h: cell_h,
            };
            write_axes(f, axes, cell)?;
        }

        writeln!(f, "</svg>")
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

fn write_axes(f: &mut fmt::Formatter<'_>, axes: &Axes, cell: Rect) -> fmt::Result {
    let plot = Rect {
        x: cell.x + MARGIN_LEFT,
        y: cell.y + MARGIN_TOP,
        w: (cell.w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        h: (cell.h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    };

    let x_ticks = axes.resolved_x_ticks();
    let y_ticks = axes.y_ticks();
    let x_domain = extent(x_ticks.iter().map(|t| t.value), axes.bounds().map(|b| b.x));
    let y_domain = extent(y_ticks.iter().copied(), axes.bounds().map(|b| b.y));
    let sx = LinearScale::new(x_domain, (plot.x, plot.x + plot.w));
    let sy = LinearScale::new(y_domain, (plot.y + plot.h, plot.y));

    writeln!(f, r#"<g class="axes">"#)?;
    writeln!(
        f,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#000000"/>"##,
        plot.x, plot.y, plot.w, plot.h
    )?;

    let bottom = plot.y + plot.h;
    for tick in &x_ticks {
        let x = sx.map(tick.value);
        writeln!(
            f,
            r##"<line x1="{x:.2}" y1="{bottom:.2}" x2="{x:.2}" y2="{:.2}" stroke="#000000"/>"##,
            bottom + TICK_LEN
        )?;
        writeln!(
            f,
            r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle" font-size="10">{}</text>"#,
            bottom + TICK_LEN + 11.0,
            Escaped(&tick.label)
        )?;
    }

    let y_step = tick_step(&y_ticks);
    for &value in &y_ticks {
        let y = sy.map(value);
        writeln!(
            f,
            r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#000000"/>"##,
            plot.x - TICK_LEN,
            plot.x
        )?;
        writeln!(
            f,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end" font-size="10">{}</text>"#,
            plot.x - TICK_LEN - 2.0,
            y + 3.5,
            Escaped(&format_tick(value, y_step))
        )?;
    }

    for (index, series) in axes.series.iter().enumerate() {
        let color = series.color.unwrap_or_else(|| Color::cycle(index));
        match &series.data {
            SeriesData::Line(points) => {
                let mut path = String::new();
                for (x, y) in points {
                    write!(path, "{:.2},{:.2} ", sx.map(*x), sy.map(*y))?;
                }
                writeln!(
                    f,
                    r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1.5"/>"#,
                    path.trim_end()
                )?;
            }
            SeriesData::Scatter(points) => {
                for (x, y) in points {
                    writeln!(
                        f,
                        r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{color}"/>"#,
                        sx.map(*x),
                        sy.map(*y)
                    )?;
                }
            }
            SeriesData::Bars(bars) => {
                for bar in bars {
                    let left = sx.map(bar.x0);
                    let right = sx.map(bar.x1);
                    let top = sy.map(bar.height);
                    let base = sy.map(0.0);
                    writeln!(
                        f,
                        r##"<rect x="{left:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}" stroke="#000000" stroke-width="0.5"/>"##,
                        top.min(base),
                        (right - left).abs(),
                        (base - top).abs()
                    )?;
                }
            }
        }
    }

    if let Some(title) = &axes.title {
        writeln!(
            f,
            r#"<text class="title" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="13">{}</text>"#,
            plot.x + plot.w / 2.0,
            plot.y - 8.0,
            Escaped(title)
        )?;
    }
    if let Some(label) = &axes.x_label {
        writeln!(
            f,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="11">{}</text>"#,
            plot.x + plot.w / 2.0,
            bottom + 34.0,
            Escaped(label)
        )?;
    }
    if let Some(label) = &axes.y_label {
        let (x, y) = (cell.x + 14.0, plot.y + plot.h / 2.0);
        writeln!(
            f,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="11" transform="rotate(-90 {x:.2} {y:.2})">{}</text>"#,
            Escaped(label)
        )?;
    }
    if axes.show_legend {
        write_legend(f, axes, plot)?;
    }

    writeln!(f, "</g>")
}

#[allow(clippy::cast_precision_loss)]
fn write_legend(f: &mut fmt::Formatter<'_>, axes: &Axes, plot: Rect) -> fmt::Result {
    let entries: Vec<_> = axes
        .series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            s.label
                .as_deref()
                .map(|label| (label, s.color.unwrap_or_else(|| Color::cycle(i))))
        })
        .collect();
    if entries.is_empty() {
        return Ok(());
    }

    let longest = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let width = longest as f64 * 6.5 + 30.0;
    let height = entries.len() as f64 * 16.0 + 8.0;
    let x = plot.x + plot.w - width - 6.0;
    let y = plot.y + 6.0;

    writeln!(
        f,
        r##"<g class="legend"><rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="#ffffff" stroke="#cccccc"/>"##
    )?;
    for (row, (label, color)) in entries.iter().enumerate() {
        let cy = (row as f64).mul_add(16.0, y + 12.0);
        writeln!(
            f,
            r#"<circle cx="{:.2}" cy="{cy:.2}" r="4" fill="{color}"/><text x="{:.2}" y="{:.2}" font-size="10">{}</text>"#,
            x + 10.0,
            x + 20.0,
            cy + 3.5,
            Escaped(label)
        )?;
    }
    writeln!(f, "</g>")
}

/// Domain spanning both the ticks and the data.
fn extent(ticks: impl Iterator<Item = f64>, data: Option<(f64, f64)>) -> (f64, f64) {
    let init = data.unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
    let (lo, hi) = ticks.fold(init, |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// XML-escapes text content and attribute values.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::charts::{Color, Figure, Histogram};

    #[test]
    fn test_scatter_with_legend() {
        let mut figure = Figure::new(1, 1);
        let axes = figure.subplot(1, 1, 1).unwrap();
        axes.scatter(&[25.0, 27.0], &[99.0, 86.0])
            .unwrap()
            .color(Color::BLUE)
            .label("Day 1");
        axes.scatter(&[22.0], &[100.0])
            .unwrap()
            .color(Color::RED)
            .label("Day 2");
        axes.set_xlabel("Age").set_ylabel("Speed").legend();

        let svg = figure.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r##"r="3" fill="#0000ff""##).count(), 2);
        assert_eq!(svg.matches(r##"r="3" fill="#ff0000""##).count(), 1);
        assert!(svg.contains(">Day 1</text>"));
        assert!(svg.contains(">Age</text>"));
        assert!(svg.contains("rotate(-90"));
    }

    #[test]
    fn test_suptitle_and_panels() {
        let mut figure = Figure::new(1, 3);
        for i in 1..=3 {
            let axes = figure.subplot(1, 3, i).unwrap();
            axes.set_title(format!("plot {i}"));
            axes.plot(&[4.0, 1.0, 2.0, 3.0], &[3.0, 8.0, 1.0, 10.0]).unwrap();
        }
        figure.set_suptitle("Subplot", Color::RED, 20.0);

        let svg = figure.to_svg();
        assert_eq!(svg.matches(r#"<g class="axes">"#).count(), 3);
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(svg.contains(r##"font-size="20" fill="#ff0000">Subplot</text>"##));
    }

    #[test]
    fn test_histogram_bars_and_ticks() {
        let marks = [90.0, 50.0, 40.0, 60.0, 55.0, 44.0, 30.0, 10.0, 34.0, 84.0, 69.0];
        let hist = Histogram::with_edges(&marks, &[0.0, 35.0, 70.0, 100.0]).unwrap();

        let mut figure = Figure::new(1, 1);
        let axes = figure.subplot(1, 1, 1).unwrap();
        axes.hist(&hist).color(Color::RED);
        axes.set_xticks(&[0.0, 35.0, 70.0, 100.0]);

        let svg = figure.to_svg();
        assert_eq!(svg.matches(r##"fill="#ff0000" stroke="#000000""##).count(), 3);
        for label in ["0", "35", "70", "100"] {
            assert!(svg.contains(&format!(">{label}</text>")));
        }
    }

    #[test]
    fn test_text_is_escaped() {
        let mut figure = Figure::new(1, 1);
        figure
            .subplot(1, 1, 1)
            .unwrap()
            .set_title("Sales <Q1> & \"Q2\"");
        let svg = figure.to_svg();
        assert!(svg.contains("Sales &lt;Q1&gt; &amp; &quot;Q2&quot;"));
        assert!(!svg.contains("<Q1>"));
    }

    #[test]
    fn test_empty_figure_renders() {
        let svg = Figure::new(2, 2).to_svg();
        assert_eq!(svg.matches(r#"<g class="axes">"#).count(), 4);
    }
}
