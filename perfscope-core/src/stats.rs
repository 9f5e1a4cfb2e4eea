//! Summary statistics — pure functions over a sample slice.
//!
//! Every function takes samples in, scalar out. Functions whose name ends in
//! `_sorted` require ascending input; the engine sorts once and shares the
//! buffer between the median, min/max and percentile calculations.

use serde::{Deserialize, Serialize};

/// Location and range of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise an ascending, non-empty slice. Returns `None` when empty.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        // A constant sample must report its value exactly, not a rounded sum.
        let mean = if min == max { min } else { mean_f64(sorted) };
        Some(Self {
            count: sorted.len(),
            mean,
            median: median_sorted(sorted),
            min,
            max,
        })
    }

    /// Width of the observed range.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Dispersion of a sample set (population convention, divisor n).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub std: f64,
    pub variance: f64,
}

impl Spread {
    /// Population standard deviation and variance around `summary.mean`.
    ///
    /// A constant sample yields exactly zero.
    pub fn compute(samples: &[f64], summary: &Summary) -> Self {
        if samples.is_empty() || summary.min == summary.max {
            return Self {
                std: 0.0,
                variance: 0.0,
            };
        }
        let variance = population_variance(samples, summary.mean);
        Self {
            std: variance.sqrt(),
            variance,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.std == 0.0
    }
}

pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an ascending slice; the average of the two middle values for
/// even lengths. Returns 0.0 when empty.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Mean squared deviation from `mean`.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Percentage of samples in the closed interval `[lower, upper]`.
pub fn containment_pct(samples: &[f64], lower: f64, upper: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let inside = samples
        .iter()
        .filter(|&&x| lower <= x && x <= upper)
        .count();
    inside as f64 / samples.len() as f64 * 100.0
}

/// Ascending copy of `samples`. Non-finite values must be rejected before
/// calling; they would sort arbitrarily.
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_known_values() {
        let sorted = sorted_copy(&[4.0, 1.0, 3.0, 2.0]);
        let s = Summary::from_sorted(&sorted).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.range(), 3.0);
    }

    #[test]
    fn summary_empty_is_none() {
        assert!(Summary::from_sorted(&[]).is_none());
    }

    #[test]
    fn median_odd_length() {
        assert_eq!(median_sorted(&[1.0, 2.0, 10.0]), 2.0);
    }

    #[test]
    fn constant_sample_mean_is_exact() {
        let data = vec![0.1; 10];
        let s = Summary::from_sorted(&data).unwrap();
        assert_eq!(s.mean, 0.1);
        let spread = Spread::compute(&data, &s);
        assert_eq!(spread.std, 0.0);
        assert!(spread.is_degenerate());
    }

    #[test]
    fn population_std_known() {
        // Classic example: population std of this set is exactly 2.
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = Summary::from_sorted(&sorted_copy(&data)).unwrap();
        let spread = Spread::compute(&data, &s);
        assert!((spread.std - 2.0).abs() < 1e-12);
        assert!((spread.variance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn containment_is_inclusive() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(containment_pct(&data, 1.0, 4.0), 100.0);
        assert_eq!(containment_pct(&data, 2.0, 3.0), 50.0);
        assert_eq!(containment_pct(&data, 5.0, 6.0), 0.0);
        assert_eq!(containment_pct(&[], 0.0, 1.0), 0.0);
    }

    #[test]
    fn mean_empty_is_zero() {
        assert_eq!(mean_f64(&[]), 0.0);
    }
}
