//! Histogram binning.

use super::ChartError;

/// Counts of values falling into consecutive bins.
///
/// Bins are half-open `[edge[i], edge[i + 1])` except the last, which also
/// includes its right edge. Values outside the edges are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` using explicit bin `edges`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::TooFewEdges`] for fewer than two edges and
    /// [`ChartError::EdgesNotIncreasing`] unless the edges are finite and
    /// strictly increasing.
    pub fn with_edges(values: &[f64], edges: &[f64]) -> Result<Self, ChartError> {
        let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
            return Err(ChartError::TooFewEdges);
        };
        if edges.len() < 2 {
            return Err(ChartError::TooFewEdges);
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ChartError::EdgesNotIncreasing);
        }

        let bin_count = edges.len() - 1;
        let mut counts = vec![0; bin_count];
        for &value in values {
            if !(first..=last).contains(&value) {
                continue;
            }
            let bin = edges
                .partition_point(|edge| *edge <= value)
                .saturating_sub(1)
                .min(bin_count - 1);
            if let Some(count) = counts.get_mut(bin) {
                *count += 1;
            }
        }

        Ok(Self {
            edges: edges.to_vec(),
            counts,
        })
    }

    /// Bin `values` into `bins` equal-width bins spanning their range.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::NoData`] when there is no finite value.
    #[allow(clippy::cast_precision_loss)]
    pub fn uniform(values: &[f64], bins: usize) -> Result<Self, ChartError> {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .ok_or(ChartError::NoData)?;

        let (min, max) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
        let bins = bins.max(1);
        let width = (max - min) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| (i as f64).mul_add(width, min)).collect();
        edges.push(max);

        Self::with_edges(values, &edges)
    }

    /// Bin edges, one more than the number of bins.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Count per bin.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Iterate `(left edge, right edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, count)| (w[0], w[1], *count))
    }

    /// Total number of values counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MARKS: [f64; 11] = [90.0, 50.0, 40.0, 60.0, 55.0, 44.0, 30.0, 10.0, 34.0, 84.0, 69.0];

    #[test]
    fn test_grade_intervals() {
        let hist = Histogram::with_edges(&MARKS, &[0.0, 35.0, 70.0, 100.0]).unwrap();
        assert_eq!(hist.counts(), &[3, 6, 2]);
        assert_eq!(hist.total(), MARKS.len());
    }

    #[test]
    fn test_edges_are_half_open_except_last() {
        let hist =
            Histogram::with_edges(&[0.0, 35.0, 70.0, 100.0], &[0.0, 35.0, 70.0, 100.0]).unwrap();
        assert_eq!(hist.counts(), &[1, 1, 2]);
    }

    #[test]
    fn test_values_outside_edges_are_ignored() {
        let hist = Histogram::with_edges(&[-1.0, 5.0, 101.0, f64::NAN], &[0.0, 50.0, 100.0])
            .unwrap();
        assert_eq!(hist.counts(), &[1, 0]);
    }

    #[test]
    fn test_invalid_edges() {
        assert_eq!(
            Histogram::with_edges(&MARKS, &[0.0]),
            Err(ChartError::TooFewEdges)
        );
        assert_eq!(
            Histogram::with_edges(&MARKS, &[]),
            Err(ChartError::TooFewEdges)
        );
        assert_eq!(
            Histogram::with_edges(&MARKS, &[0.0, 50.0, 50.0]),
            Err(ChartError::EdgesNotIncreasing)
        );
    }

    #[test]
    fn test_uniform_bins() {
        let hist = Histogram::uniform(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(hist.edges().len(), 4);
        assert_eq!(hist.total(), 4);
        assert_eq!(Histogram::uniform(&[], 3), Err(ChartError::NoData));

        let single = Histogram::uniform(&[5.0, 5.0], 2).unwrap();
        assert_eq!(single.counts(), &[0, 2]);
    }
}
