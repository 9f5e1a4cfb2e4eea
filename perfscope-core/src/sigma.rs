//! Sigma-level calculator — symmetric `mean ± k·std` ranges and their
//! empirical containment.

use serde::{Deserialize, Serialize};

use crate::policy::SIGMA_LEVELS;
use crate::stats::containment_pct;

/// One `mean ± k·std` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmaRange {
    pub k: u8,
    pub lower: f64,
    pub upper: f64,
    /// Percentage of samples with `lower <= x <= upper`.
    pub within: f64,
}

impl SigmaRange {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Sigma ranges ordered by ascending `k`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigmaTable {
    rows: Vec<SigmaRange>,
}

impl SigmaTable {
    /// Compute ranges for every configured multiplier.
    ///
    /// With `std == 0` every range collapses onto `mean` and containment is
    /// 100% by construction.
    pub fn compute(samples: &[f64], mean: f64, std: f64) -> Self {
        let rows = SIGMA_LEVELS
            .iter()
            .map(|&k| {
                if std == 0.0 {
                    return SigmaRange {
                        k,
                        lower: mean,
                        upper: mean,
                        within: 100.0,
                    };
                }
                let half_width = f64::from(k) * std;
                let lower = mean - half_width;
                let upper = mean + half_width;
                SigmaRange {
                    k,
                    lower,
                    upper,
                    within: containment_pct(samples, lower, upper),
                }
            })
            .collect();
        Self { rows }
    }

    /// Build a table from precomputed rows, sorted by `k`.
    pub fn from_rows(mut rows: Vec<SigmaRange>) -> Self {
        rows.sort_by_key(|row| row.k);
        Self { rows }
    }

    pub fn get(&self, k: u8) -> Option<&SigmaRange> {
        self.rows.iter().find(|row| row.k == k)
    }

    /// Containment for multiplier `k`, if present.
    pub fn within(&self, k: u8) -> Option<f64> {
        self.get(k).map(|row| row.within)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigmaRange> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
