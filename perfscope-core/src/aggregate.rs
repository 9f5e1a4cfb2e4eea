//! Multi-dataset aggregator — runs the engine per dataset and once over the
//! pooled samples.
//!
//! Datasets that failed to load, or that the engine rejects, are reported as
//! [`DatasetFailure`]s and excluded from both the per-dataset map and the
//! pool. One bad dataset never aborts the others.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::MetricsEngine;
use crate::error::EngineError;
use crate::quality::DataQuality;
use crate::record::MetricsRecord;

/// A dataset excluded from the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFailure {
    pub identifier: String,
    pub reason: String,
}

/// Number of datasets per quality tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityHistogram {
    counts: BTreeMap<DataQuality, usize>,
    /// Datasets with no samples, which have no quality tier.
    pub unrated: usize,
}

impl QualityHistogram {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MetricsRecord>) -> Self {
        let mut histogram = Self::default();
        for record in records {
            match record.quality() {
                Some(quality) => *histogram.counts.entry(quality).or_insert(0) += 1,
                None => histogram.unrated += 1,
            }
        }
        histogram
    }

    pub fn get(&self, quality: DataQuality) -> usize {
        self.counts.get(&quality).copied().unwrap_or(0)
    }

    /// Every tier in ascending order, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (DataQuality, usize)> + '_ {
        DataQuality::ALL.into_iter().map(|q| (q, self.get(q)))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.unrated
    }
}

/// Per-dataset records, the pooled record and the failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub per_dataset: BTreeMap<String, MetricsRecord>,
    pub pooled: MetricsRecord,
    pub histogram: QualityHistogram,
    pub failures: Vec<DatasetFailure>,
}

impl Comparison {
    pub fn succeeded(&self) -> usize {
        self.per_dataset.len()
    }

    pub fn all_failed(&self) -> bool {
        self.per_dataset.is_empty() && !self.failures.is_empty()
    }
}

/// Runs one engine across many datasets.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    engine: MetricsEngine,
    parallel: bool,
}

impl Aggregator {
    pub fn new(engine: MetricsEngine) -> Self {
        Self {
            engine,
            parallel: false,
        }
    }

    /// Compute per-dataset records on the rayon pool. The output is identical
    /// to the serial path.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    /// Aggregate already-loaded datasets.
    pub fn aggregate_samples(
        &self,
        datasets: &BTreeMap<String, Vec<f64>>,
    ) -> Result<Comparison, EngineError> {
        self.aggregate(
            datasets
                .iter()
                .map(|(id, samples)| (id.clone(), Ok::<_, std::convert::Infallible>(samples.clone()))),
        )
    }

    /// Aggregate datasets whose acquisition may have failed.
    ///
    /// `Err` inputs become failures carrying the error's message. Only an
    /// engine failure on the pooled samples is returned as `Err`, which a
    /// validated policy cannot produce.
    pub fn aggregate<E: Display>(
        &self,
        inputs: impl IntoIterator<Item = (String, Result<Vec<f64>, E>)>,
    ) -> Result<Comparison, EngineError> {
        let mut failures = Vec::new();
        let mut loaded: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for (identifier, outcome) in inputs {
            // First occurrence wins, whether it loaded or not.
            if !seen.insert(identifier.clone()) {
                warn!(dataset = %identifier, "duplicate dataset identifier, skipping");
                failures.push(DatasetFailure {
                    identifier,
                    reason: "duplicate dataset identifier".into(),
                });
                continue;
            }
            match outcome {
                Ok(samples) => {
                    loaded.insert(identifier, samples);
                }
                Err(err) => {
                    warn!(dataset = %identifier, error = %err, "dataset excluded");
                    failures.push(DatasetFailure {
                        identifier,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let computed: Vec<(&String, Result<MetricsRecord, EngineError>)> = if self.parallel {
            loaded
                .par_iter()
                .map(|(id, samples)| (id, self.engine.compute(samples)))
                .collect()
        } else {
            loaded
                .iter()
                .map(|(id, samples)| (id, self.engine.compute(samples)))
                .collect()
        };

        let mut per_dataset = BTreeMap::new();
        let mut pool = Vec::new();
        for (identifier, outcome) in computed {
            match outcome {
                Ok(record) => {
                    debug!(dataset = %identifier, count = record.count(), tier = %record.tier(), "dataset analysed");
                    pool.extend_from_slice(&loaded[identifier]);
                    per_dataset.insert(identifier.clone(), record);
                }
                Err(err) => {
                    warn!(dataset = %identifier, error = %err, "dataset rejected by engine");
                    failures.push(DatasetFailure {
                        identifier: identifier.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let pooled = self.engine.compute(&pool)?;
        let histogram = QualityHistogram::from_records(per_dataset.values());

        Ok(Comparison {
            per_dataset,
            pooled,
            histogram,
            failures,
        })
    }
}
