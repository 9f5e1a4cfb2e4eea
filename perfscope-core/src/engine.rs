//! Metrics engine — applies the tiered gating policy to one sample set.
//!
//! Tiers by ascending count (default policy):
//!
//! | count   | tier            | computed                                   |
//! |---------|-----------------|--------------------------------------------|
//! | 0       | `Empty`         | nothing                                    |
//! | 1–4     | `Severe`        | mean, median, min, max                     |
//! | 5–9     | `Low`           | mean, median, min, max                     |
//! | 10–29   | `Basic`         | + std, variance, percentiles               |
//! | 30–99   | `SigmaEligible` | + sigma table                              |
//! | ≥ 100   | `Full`          | + recommended and strict intervals         |
//!
//! The quality tier is attached to every non-empty record. The engine holds
//! only its policy, so one instance can serve any number of threads.

use tracing::debug;

use crate::error::EngineError;
use crate::interval::{recommend, IntervalInputs};
use crate::percentile::PercentileTable;
use crate::policy::AnalysisPolicy;
use crate::quality::DataQuality;
use crate::record::{
    BasicMetrics, FullMetrics, InsufficientMetrics, MetricsRecord, SigmaMetrics,
};
use crate::sigma::SigmaTable;
use crate::stats::{sorted_copy, Spread, Summary};

/// Stateless metrics engine bound to a validated policy.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    policy: AnalysisPolicy,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            policy: AnalysisPolicy::default(),
        }
    }
}

impl MetricsEngine {
    /// Create an engine, rejecting policies whose gates do not ascend.
    pub fn new(policy: AnalysisPolicy) -> Result<Self, EngineError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &AnalysisPolicy {
        &self.policy
    }

    /// Compute the metrics record for `samples`.
    ///
    /// An empty slice is the `Empty` tier, not an error. Any NaN or infinite
    /// sample fails the whole call.
    pub fn compute(&self, samples: &[f64]) -> Result<MetricsRecord, EngineError> {
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFiniteSample { index, value });
        }

        let policy = &self.policy;
        let sorted = sorted_copy(samples);
        let Some(summary) = Summary::from_sorted(&sorted) else {
            debug!("empty sample set");
            return Ok(MetricsRecord::Empty);
        };
        let count = summary.count;
        let quality = DataQuality::classify(count, &policy.quality_bands);

        if count < policy.min_stats_count {
            debug!(count, "below statistics gate, location only");
            let metrics = InsufficientMetrics { summary, quality };
            return Ok(if count < policy.severe_below {
                MetricsRecord::Severe(metrics)
            } else {
                MetricsRecord::Low(metrics)
            });
        }

        let basic = BasicMetrics {
            summary,
            spread: Spread::compute(&sorted, &summary),
            percentiles: PercentileTable::compute(&sorted, policy),
            quality,
        };
        if count < policy.sigma_min_count {
            debug!(count, "basic tier");
            return Ok(MetricsRecord::Basic(basic));
        }

        let sigma = SigmaTable::compute(&sorted, summary.mean, basic.spread.std);
        if count < policy.interval_min_count {
            debug!(count, "sigma tier");
            return Ok(MetricsRecord::SigmaEligible(SigmaMetrics { basic, sigma }));
        }

        let inputs = IntervalInputs {
            samples: &sorted,
            summary: &basic.summary,
            sigma: &sigma,
            percentiles: &basic.percentiles,
        };
        let intervals = recommend(&inputs, policy).ok_or(EngineError::MissingStatistic {
            tier: "full",
            name: "sigma rows 2/3/6 or percentiles P1/P5/P95/P99",
        })?;
        debug!(
            count,
            recommended = intervals.recommended.method.label(),
            strict = intervals.strict.method.label(),
            "full tier"
        );
        Ok(MetricsRecord::Full(FullMetrics {
            basic,
            sigma,
            intervals,
        }))
    }
}

/// Compute a record with the default policy.
pub fn compute_metrics(samples: &[f64]) -> Result<MetricsRecord, EngineError> {
    MetricsEngine::default().compute(samples)
}
