//! perfscope Core — volume-adaptive statistics for performance samples.
//!
//! This crate is pure computation over in-memory sample sets:
//! - Summary statistics (mean, median, range, population std/variance)
//! - Volume-tiered percentile sets with linear interpolation
//! - Sigma-level ranges (2σ, 3σ, 6σ) with empirical containment
//! - Recommended and strict interval selection (sigma vs. percentile)
//! - Quality tiers and advisory guidance keyed on sample count
//! - Multi-dataset aggregation with a pooled record
//!
//! Every sample-count gate and threshold lives in [`AnalysisPolicy`].

pub mod advisory;
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod interval;
pub mod percentile;
pub mod policy;
pub mod quality;
pub mod record;
pub mod sigma;
pub mod stats;

pub use advisory::{Advisories, CountAdvisory, IntervalGuidance};
pub use aggregate::{Aggregator, Comparison, DatasetFailure, QualityHistogram};
pub use engine::{compute_metrics, MetricsEngine};
pub use error::EngineError;
pub use interval::{Interval, IntervalAssessment, IntervalMethod};
pub use percentile::{PercentileTable, PercentileValue};
pub use policy::{AnalysisPolicy, PolicyError, QualityBands};
pub use quality::DataQuality;
pub use record::{
    BasicMetrics, DataStatus, FieldValue, FullMetrics, InsufficientMetrics, MetricsRecord,
    SigmaMetrics, Tier,
};
pub use sigma::{SigmaRange, SigmaTable};
pub use stats::{Spread, Summary};
