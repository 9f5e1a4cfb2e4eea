//! Engine error type.

use thiserror::Error;

use crate::policy::PolicyError;

/// Failures of the metrics engine.
///
/// Insufficient data and zero spread are not errors; they are tiers of
/// [`crate::MetricsRecord`].
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// NaN or infinite input. Acquisition must filter these out.
    #[error("sample {index} is not finite ({value})")]
    NonFiniteSample { index: usize, value: f64 },

    #[error("invalid analysis policy: {0}")]
    Policy(#[from] PolicyError),

    /// A statistic the current tier depends on was not produced. Only
    /// reachable with a policy that bypassed validation.
    #[error("missing statistic for {tier} tier: {name}")]
    MissingStatistic {
        tier: &'static str,
        name: &'static str,
    },
}
