//! Axis scales and tick placement.

/// Maps a data interval linearly onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a data value to the output range. A zero-width domain maps
    /// everything to the middle of the range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let width = d1 - d0;
        if width.abs() < f64::EPSILON {
            return f64::midpoint(r0, r1);
        }
        (value - d0).mul_add((r1 - r0) / width, r0)
    }
}

/// Choose evenly spaced "nice" tick values covering `[min, max]`.
///
/// The step is 1, 2 or 5 times a power of ten, picked so that roughly
/// `count` intervals cover the range. The first tick is at or below `min`
/// and the last at or above `max`. A degenerate range is widened by one
/// unit each side; non-finite input yields no ticks.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let step = nice_step((hi - lo) / count.max(1) as f64);
    let start = (lo / step).floor();
    let end = (hi / step).ceil();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let intervals = (end - start).round() as usize;

    (0..=intervals)
        .map(|i| {
            let tick = (start + i as f64) * step;
            // Collapse float noise such as 0.30000000000000004 and -0.
            let cleaned = (tick / step).round() * step;
            if cleaned.abs() < step * 1e-9 { 0.0 } else { cleaned }
        })
        .collect()
}

fn nice_step(raw: f64) -> f64 {
    const SLACK: f64 = 1e-9;

    #[allow(clippy::cast_possible_truncation)]
    let exponent = raw.log10().floor() as i32;
    let magnitude = 10f64.powi(exponent);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 + SLACK {
        1.0
    } else if fraction <= 2.0 + SLACK {
        2.0
    } else if fraction <= 5.0 + SLACK {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format a tick value with just enough decimals for the given step.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let digits = (-step.log10().floor()) as usize;
        digits
    } else {
        0
    };
    let text = format!("{value:.decimals$}");
    if text.starts_with('-') && text.trim_start_matches(['-', '0', '.']).is_empty() {
        text.trim_start_matches('-').to_owned()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ticks_round_numbers() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(
            nice_ticks(78.0, 112.0, 5),
            vec![70.0, 80.0, 90.0, 100.0, 110.0, 120.0]
        );
    }

    #[test]
    fn test_nice_ticks_cover_range() {
        let ticks = nice_ticks(-0.96, 0.99, 5);
        assert!(ticks.first().is_some_and(|t| *t <= -0.96));
        assert!(ticks.last().is_some_and(|t| *t >= 0.99));
        assert!(ticks.contains(&0.0));
    }

    #[test]
    fn test_nice_ticks_degenerate_and_invalid() {
        assert_eq!(nice_ticks(5.0, 5.0, 4), vec![4.0, 4.5, 5.0, 5.5, 6.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert_eq!(nice_ticks(10.0, 0.0, 5), nice_ticks(0.0, 10.0, 5));
    }

    #[test]
    fn test_linear_scale_maps_and_inverts() {
        let scale = LinearScale::new((0.0, 10.0), (300.0, 100.0));
        assert!((scale.map(0.0) - 300.0).abs() < 1e-9);
        assert!((scale.map(5.0) - 200.0).abs() < 1e-9);
        assert!((scale.map(10.0) - 100.0).abs() < 1e-9);

        let flat = LinearScale::new((3.0, 3.0), (0.0, 50.0));
        assert!((flat.map(3.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(35.0, 5.0), "35");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(-0.0, 0.2), "0.0");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }
}
