//! Interval recommender — picks a "typical value" interval and a strict
//! interval, each from either the sigma table or the percentile table.
//!
//! Sigma-based estimators are used only when the data's own containment says
//! it behaves near-normally; otherwise the percentile band wins. Thresholds
//! are strict: exactly 99.0% containment falls through to percentiles.
//!
//! The two intervals are computed independently and are not guaranteed to
//! nest.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::percentile::PercentileTable;
use crate::policy::AnalysisPolicy;
use crate::sigma::SigmaTable;
use crate::stats::{containment_pct, Summary};

/// Estimator an interval was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMethod {
    /// `mean ± 2σ`, chosen when 3σ containment shows a near-normal fit.
    TwoSigma,
    /// `[P5, P95]`.
    PercentileBand,
    /// `mean ± 6σ`, chosen for very low-noise data.
    SixSigma,
    /// `[P1, P99]`.
    StrictPercentile,
}

impl IntervalMethod {
    pub fn label(self) -> &'static str {
        match self {
            IntervalMethod::TwoSigma => "2-Sigma (near-normal fit)",
            IntervalMethod::PercentileBand => "Percentile (P5–P95)",
            IntervalMethod::SixSigma => "6-Sigma (very high data quality)",
            IntervalMethod::StrictPercentile => "Strict percentile (P1–P99)",
        }
    }

    /// Coverage the estimator promises in theory (percent).
    pub fn nominal_coverage(self) -> f64 {
        match self {
            IntervalMethod::TwoSigma => 95.449_973_610_364,
            IntervalMethod::PercentileBand => 90.0,
            IntervalMethod::SixSigma => 99.999_999_802_682,
            IntervalMethod::StrictPercentile => 98.0,
        }
    }

    pub fn is_sigma_based(self) -> bool {
        matches!(self, IntervalMethod::TwoSigma | IntervalMethod::SixSigma)
    }
}

impl fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A clamped interval with its empirical and nominal coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    /// Empirical containment of the clamped interval over all samples.
    pub within: f64,
    /// Theoretical coverage of the estimator before clamping.
    pub nominal_coverage: f64,
    pub method: IntervalMethod,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Recommended and strict intervals for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalAssessment {
    pub recommended: Interval,
    pub strict: Interval,
}

/// Statistics the recommender reads. Missing rows yield `None` from
/// [`recommend`].
pub struct IntervalInputs<'a> {
    pub samples: &'a [f64],
    pub summary: &'a Summary,
    pub sigma: &'a SigmaTable,
    pub percentiles: &'a PercentileTable,
}

/// Choose and clamp both intervals.
///
/// Returns `None` if a required sigma row (2, 3, 6) or percentile (1, 5,
/// 95, 99) is missing, which a validated policy rules out.
pub fn recommend(inputs: &IntervalInputs<'_>, policy: &AnalysisPolicy) -> Option<IntervalAssessment> {
    let sigma = inputs.sigma;
    let pct = inputs.percentiles;

    let (lower, upper, method) = if sigma.within(3)? > policy.normal_fit_threshold {
        let row = sigma.get(2)?;
        (row.lower, row.upper, IntervalMethod::TwoSigma)
    } else {
        (pct.get(5)?, pct.get(95)?, IntervalMethod::PercentileBand)
    };
    let recommended = clamp_interval(inputs, lower, upper, method);

    let (lower, upper, method) = if sigma.within(6)? > policy.high_quality_threshold {
        let row = sigma.get(6)?;
        (row.lower, row.upper, IntervalMethod::SixSigma)
    } else {
        (pct.get(1)?, pct.get(99)?, IntervalMethod::StrictPercentile)
    };
    let strict = clamp_interval(inputs, lower, upper, method);

    Some(IntervalAssessment {
        recommended,
        strict,
    })
}

fn clamp_interval(
    inputs: &IntervalInputs<'_>,
    lower: f64,
    upper: f64,
    method: IntervalMethod,
) -> Interval {
    let lower = lower.max(inputs.summary.min);
    let upper = upper.min(inputs.summary.max);
    Interval {
        lower,
        upper,
        within: containment_pct(inputs.samples, lower, upper),
        nominal_coverage: method.nominal_coverage(),
        method,
    }
}
