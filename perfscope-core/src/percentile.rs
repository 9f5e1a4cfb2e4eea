//! Percentile calculator — volume-tiered percentile sets with linear
//! interpolation between order statistics.
//!
//! Tail percentiles (P1, P99) are withheld below the full-set gate rather
//! than reported from a handful of points.

use serde::{Deserialize, Serialize};

use crate::policy::AnalysisPolicy;

/// One percentile estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub level: u8,
    pub value: f64,
}

/// Ordered percentile estimates, ascending by level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentileTable {
    rows: Vec<PercentileValue>,
}

impl PercentileTable {
    /// Compute the percentile set the policy selects for `sorted.len()`.
    pub fn compute(sorted: &[f64], policy: &AnalysisPolicy) -> Self {
        let rows = policy
            .percentile_levels(sorted.len())
            .iter()
            .map(|&level| PercentileValue {
                level,
                value: percentile_sorted(sorted, f64::from(level)),
            })
            .collect();
        Self { rows }
    }

    /// Value at `level`, if that level is part of this table.
    pub fn get(&self, level: u8) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.level == level)
            .map(|row| row.value)
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(|row| row.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PercentileValue> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Percentile `p` (0..=100) of an ascending slice.
///
/// Rank `p/100 * (n-1)` interpolated linearly between neighbouring order
/// statistics. Returns 0.0 for an empty slice.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    match n {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    let lower = sorted[lower_idx];
    let upper = sorted[upper_idx];
    if lower == upper {
        return lower;
    }
    lower + fraction * (upper - lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn linear_interpolation_matches_reference() {
        let data = ascending(10);
        // rank = 0.05 * 9 = 0.45 -> 1 + 0.45
        assert!((percentile_sorted(&data, 5.0) - 1.45).abs() < 1e-12);
        assert!((percentile_sorted(&data, 50.0) - 5.5).abs() < 1e-12);
        // rank = 0.95 * 9 = 8.55 -> 9 + 0.55
        assert!((percentile_sorted(&data, 95.0) - 9.55).abs() < 1e-12);
        assert_eq!(percentile_sorted(&data, 0.0), 1.0);
        assert_eq!(percentile_sorted(&data, 100.0), 10.0);
    }

    #[test]
    fn single_and_empty() {
        assert_eq!(percentile_sorted(&[7.0], 99.0), 7.0);
        assert_eq!(percentile_sorted(&[], 50.0), 0.0);
    }

    #[test]
    fn constant_sample_percentiles_are_exact() {
        let data = vec![0.3; 25];
        let table = PercentileTable::compute(&data, &AnalysisPolicy::default());
        assert!(table.iter().all(|row| row.value == 0.3));
    }

    #[test]
    fn table_follows_tier() {
        let policy = AnalysisPolicy::default();

        let small = PercentileTable::compute(&ascending(10), &policy);
        assert_eq!(small.levels().collect::<Vec<_>>(), vec![5, 50, 95]);
        assert!(small.get(1).is_none());

        let mid = PercentileTable::compute(&ascending(20), &policy);
        assert_eq!(mid.levels().collect::<Vec<_>>(), vec![5, 25, 50, 75, 95]);

        let full = PercentileTable::compute(&ascending(50), &policy);
        assert_eq!(full.len(), 9);
        assert!(full.get(1).is_some());
        assert!(full.get(99).is_some());

        let none = PercentileTable::compute(&ascending(9), &policy);
        assert!(none.is_empty());
    }

    #[test]
    fn table_values_are_non_decreasing() {
        let data = ascending(200);
        let table = PercentileTable::compute(&data, &AnalysisPolicy::default());
        let values: Vec<f64> = table.iter().map(|r| r.value).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn serializes_as_plain_list() {
        let table = PercentileTable::compute(&ascending(10), &AnalysisPolicy::default());
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with("[{\"level\":5"));
    }
}
