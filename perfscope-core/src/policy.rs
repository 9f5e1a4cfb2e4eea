//! Analysis policy — every sample-count gate and containment threshold the
//! engine applies, as one serializable value.
//!
//! Defaults are the stock gates (5 / 10 / 30 / 100). Callers may tighten or relax
//! individual gates, but `validate()` must pass before a policy is handed to
//! the engine: the tiers only make sense when they ascend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`AnalysisPolicy::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("sample-count gates must ascend: {lower_name} ({lower}) must not exceed {upper_name} ({upper})")]
    GateOrder {
        lower_name: &'static str,
        lower: usize,
        upper_name: &'static str,
        upper: usize,
    },

    #[error("{name} must be greater than zero")]
    ZeroGate { name: &'static str },

    #[error("{name} must be a percentage in (0, 100], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
}

/// Count bands used by the quality classifier.
///
/// Each field is the inclusive lower bound of its tier; anything below
/// `insufficient` is severely insufficient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QualityBands {
    pub insufficient: usize,
    pub fair: usize,
    pub good: usize,
    pub excellent: usize,
}

impl Default for QualityBands {
    fn default() -> Self {
        Self {
            insufficient: 30,
            fair: 100,
            good: 500,
            excellent: 1000,
        }
    }
}

/// Gating policy for the metrics engine, percentile tiers and advisories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisPolicy {
    /// Below this count the record is `Severe`; from here up to
    /// `min_stats_count` it is `Low`.
    pub severe_below: usize,
    /// Minimum count for std, variance and percentiles.
    pub min_stats_count: usize,
    /// Minimum count for the sigma-level table.
    pub sigma_min_count: usize,
    /// Minimum count for the recommended/strict intervals.
    pub interval_min_count: usize,
    /// Minimum count for the full P1..P99 percentile set.
    pub full_percentile_min_count: usize,
    /// Minimum count for the five-point percentile set.
    pub mid_percentile_min_count: usize,
    /// `within_3sigma` must exceed this for the 2σ recommended interval.
    pub normal_fit_threshold: f64,
    /// `within_6sigma` must exceed this for the 6σ strict interval.
    pub high_quality_threshold: f64,
    /// `within_recommended` above this earns a reliability note.
    pub recommended_praise_threshold: f64,
    /// `within_3sigma` above this marks the normality assumption reasonable.
    pub normality_advice_threshold: f64,
    pub quality_bands: QualityBands,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            severe_below: 5,
            min_stats_count: 10,
            sigma_min_count: 30,
            interval_min_count: 100,
            full_percentile_min_count: 50,
            mid_percentile_min_count: 20,
            normal_fit_threshold: 99.0,
            high_quality_threshold: 99.9,
            recommended_praise_threshold: 90.0,
            normality_advice_threshold: 95.0,
            quality_bands: QualityBands::default(),
        }
    }
}

impl AnalysisPolicy {
    /// Check that gates ascend and thresholds are percentages.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.severe_below == 0 {
            return Err(PolicyError::ZeroGate {
                name: "severe_below",
            });
        }

        let gates = [
            ("severe_below", self.severe_below),
            ("min_stats_count", self.min_stats_count),
            ("mid_percentile_min_count", self.mid_percentile_min_count),
            ("full_percentile_min_count", self.full_percentile_min_count),
            ("interval_min_count", self.interval_min_count),
        ];
        check_ascending(&gates)?;
        check_ascending(&[
            ("min_stats_count", self.min_stats_count),
            ("sigma_min_count", self.sigma_min_count),
            ("interval_min_count", self.interval_min_count),
        ])?;

        let bands = self.quality_bands;
        check_ascending(&[
            ("quality_bands.insufficient", bands.insufficient),
            ("quality_bands.fair", bands.fair),
            ("quality_bands.good", bands.good),
            ("quality_bands.excellent", bands.excellent),
        ])?;

        for (name, value) in [
            ("normal_fit_threshold", self.normal_fit_threshold),
            ("high_quality_threshold", self.high_quality_threshold),
            ("recommended_praise_threshold", self.recommended_praise_threshold),
            ("normality_advice_threshold", self.normality_advice_threshold),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(PolicyError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Percentile levels reported for `count` samples, or an empty slice
    /// below `min_stats_count`.
    pub fn percentile_levels(&self, count: usize) -> &'static [u8] {
        if count >= self.full_percentile_min_count {
            &FULL_PERCENTILES
        } else if count >= self.mid_percentile_min_count {
            &MID_PERCENTILES
        } else if count >= self.min_stats_count {
            &SMALL_PERCENTILES
        } else {
            &[]
        }
    }
}

/// Percentile set for large samples.
pub const FULL_PERCENTILES: [u8; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];
/// Percentile set once quartiles are meaningful.
pub const MID_PERCENTILES: [u8; 5] = [5, 25, 50, 75, 95];
/// Percentile set for the smallest analysable samples.
pub const SMALL_PERCENTILES: [u8; 3] = [5, 50, 95];

/// Sigma multipliers reported in the sigma table.
pub const SIGMA_LEVELS: [u8; 3] = [2, 3, 6];

fn check_ascending(gates: &[(&'static str, usize)]) -> Result<(), PolicyError> {
    for pair in gates.windows(2) {
        let (lower_name, lower) = pair[0];
        let (upper_name, upper) = pair[1];
        if lower > upper {
            return Err(PolicyError::GateOrder {
                lower_name,
                lower,
                upper_name,
                upper,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        assert_eq!(AnalysisPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_descending_gates() {
        let policy = AnalysisPolicy {
            sigma_min_count: 5,
            ..Default::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::GateOrder {
                upper_name: "sigma_min_count",
                ..
            })
        ));
    }

    #[test]
    fn rejects_interval_gate_below_full_percentiles() {
        // Intervals need P1/P99, so they cannot open before the full set does.
        let policy = AnalysisPolicy {
            interval_min_count: 40,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_threshold_outside_percentage_range() {
        let policy = AnalysisPolicy {
            high_quality_threshold: 120.0,
            ..Default::default()
        };
        assert_eq!(
            policy.validate(),
            Err(PolicyError::ThresholdOutOfRange {
                name: "high_quality_threshold",
                value: 120.0
            })
        );

        let nan = AnalysisPolicy {
            normal_fit_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_zero_severe_gate() {
        let policy = AnalysisPolicy {
            severe_below: 0,
            ..Default::default()
        };
        assert_eq!(
            policy.validate(),
            Err(PolicyError::ZeroGate {
                name: "severe_below"
            })
        );
    }

    #[test]
    fn percentile_levels_follow_volume_tiers() {
        let policy = AnalysisPolicy::default();
        assert!(policy.percentile_levels(9).is_empty());
        assert_eq!(policy.percentile_levels(10), &SMALL_PERCENTILES);
        assert_eq!(policy.percentile_levels(19), &SMALL_PERCENTILES);
        assert_eq!(policy.percentile_levels(20), &MID_PERCENTILES);
        assert_eq!(policy.percentile_levels(49), &MID_PERCENTILES);
        assert_eq!(policy.percentile_levels(50), &FULL_PERCENTILES);
    }

    #[test]
    fn partial_policy_deserializes_with_defaults() {
        let json = r#"{"sigma_min_count": 40, "quality_bands": {"fair": 120}}"#;
        let policy: AnalysisPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.sigma_min_count, 40);
        assert_eq!(policy.min_stats_count, 10);
        assert_eq!(policy.quality_bands.fair, 120);
        assert_eq!(policy.quality_bands.good, 500);
    }
}
