//! Advisory generator — fixed guidance derived from sample count and, for
//! full records, from interval containment.

use serde::{Deserialize, Serialize};

use crate::policy::AnalysisPolicy;
use crate::record::MetricsRecord;

/// Data-collection guidance keyed on sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountAdvisory {
    /// Below the statistics gate.
    StopAnalysis,
    /// Statistics available, sigma analysis not yet.
    BasicOnly,
    /// Sigma analysis available, intervals not yet.
    SigmaAvailable,
    /// Every analysis ran.
    Complete,
    /// Every analysis ran on an excellent-quality sample.
    CompleteHighConfidence,
}

impl CountAdvisory {
    pub fn for_count(count: usize, policy: &AnalysisPolicy) -> Self {
        if count < policy.min_stats_count {
            CountAdvisory::StopAnalysis
        } else if count < policy.sigma_min_count {
            CountAdvisory::BasicOnly
        } else if count < policy.interval_min_count {
            CountAdvisory::SigmaAvailable
        } else if count < policy.quality_bands.excellent {
            CountAdvisory::Complete
        } else {
            CountAdvisory::CompleteHighConfidence
        }
    }

    /// Guidance text; sample-count gates are taken from `policy`.
    pub fn message(self, policy: &AnalysisPolicy) -> String {
        match self {
            CountAdvisory::StopAnalysis => format!(
                "Too few samples for statistical analysis (fewer than {}); \
                 collect more data before drawing conclusions.",
                policy.min_stats_count
            ),
            CountAdvisory::BasicOnly => format!(
                "Basic statistics only; collect at least {} samples to enable sigma analysis.",
                policy.sigma_min_count
            ),
            CountAdvisory::SigmaAvailable => format!(
                "Sigma analysis available; collect at least {} samples for interval recommendations.",
                policy.interval_min_count
            ),
            CountAdvisory::Complete => "Sample size supports the complete analysis.".into(),
            CountAdvisory::CompleteHighConfidence => {
                "Large sample: the complete analysis is available with high confidence.".into()
            }
        }
    }
}

/// Interval-selection guidance for a full record. Several may apply at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalGuidance {
    /// The recommended interval holds most of the data.
    RecommendedReliable,
    /// 3σ containment supports treating the data as near-normal.
    NormalityReasonable,
    /// 3σ containment is weak; prefer the percentile interval.
    PreferPercentile,
    /// 6σ containment is near-total; the strict interval is trustworthy.
    SixSigmaStrict,
}

impl IntervalGuidance {
    pub fn message(self) -> &'static str {
        match self {
            IntervalGuidance::RecommendedReliable => {
                "The recommended interval covers most samples and is a reliable typical range."
            }
            IntervalGuidance::NormalityReasonable => {
                "3-sigma containment is high; the normal-distribution assumption is reasonable."
            }
            IntervalGuidance::PreferPercentile => {
                "3-sigma containment is low; prefer the percentile-based interval."
            }
            IntervalGuidance::SixSigmaStrict => {
                "6-sigma containment is near-total; the strict interval reflects very high data quality."
            }
        }
    }
}

/// All guidance for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisories {
    pub count: Option<CountAdvisory>,
    pub intervals: Vec<IntervalGuidance>,
}

impl Advisories {
    /// Derive guidance for `record`. The empty record gets none.
    pub fn for_record(record: &MetricsRecord, policy: &AnalysisPolicy) -> Self {
        let count = match record {
            MetricsRecord::Empty => None,
            _ => Some(CountAdvisory::for_count(record.count(), policy)),
        };
        Self {
            count,
            intervals: interval_guidance(record, policy),
        }
    }

    /// Count advisory first, then interval guidance.
    pub fn messages(&self, policy: &AnalysisPolicy) -> Vec<String> {
        self.count
            .iter()
            .map(|c| c.message(policy))
            .chain(self.intervals.iter().map(|g| g.message().to_string()))
            .collect()
    }
}

/// Interval guidance for a full record; empty for every other tier.
pub fn interval_guidance(record: &MetricsRecord, policy: &AnalysisPolicy) -> Vec<IntervalGuidance> {
    let MetricsRecord::Full(full) = record else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if full.intervals.recommended.within > policy.recommended_praise_threshold {
        out.push(IntervalGuidance::RecommendedReliable);
    }
    if let Some(within3) = full.sigma.within(3) {
        if within3 > policy.normality_advice_threshold {
            out.push(IntervalGuidance::NormalityReasonable);
        } else {
            out.push(IntervalGuidance::PreferPercentile);
        }
    }
    if full.sigma.within(6).is_some_and(|w| w > policy.high_quality_threshold) {
        out.push(IntervalGuidance::SixSigmaStrict);
    }
    out
}
