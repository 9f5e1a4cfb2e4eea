//! Analysis sessions — load, compute and advise for one file or many.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use perfscope_core::{
    Advisories, Aggregator, DataQuality, DatasetFailure, FieldValue, MetricsEngine, MetricsRecord,
    QualityHistogram,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::loader::{load_samples, LoadError, LoadedSamples, SourceFormat};

/// Version of the persisted analysis documents.
pub const SCHEMA_VERSION: u32 = 1;

/// Identifier of the pooled record in comparison output.
pub const POOLED_NAME: &str = "pooled";

/// Where a dataset's samples came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub skipped_tokens: usize,
    pub fingerprint: String,
}

impl From<&LoadedSamples> for SourceInfo {
    fn from(loaded: &LoadedSamples) -> Self {
        Self {
            path: loaded.path.clone(),
            format: loaded.format,
            skipped_tokens: loaded.skipped_tokens,
            fingerprint: loaded.fingerprint.clone(),
        }
    }
}

/// One dataset's record together with its advisories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnalysis {
    pub name: String,
    pub source: Option<SourceInfo>,
    pub record: MetricsRecord,
    pub advisories: Advisories,
}

impl DatasetAnalysis {
    fn new(
        name: String,
        source: Option<SourceInfo>,
        record: MetricsRecord,
        engine: &MetricsEngine,
    ) -> Self {
        let advisories = Advisories::for_record(&record, engine.policy());
        Self {
            name,
            source,
            record,
            advisories,
        }
    }

    pub fn count(&self) -> usize {
        self.record.count()
    }

    pub fn quality(&self) -> Option<DataQuality> {
        self.record.quality()
    }

    /// The flattened named-field mapping of the record.
    pub fn fields(&self) -> BTreeMap<String, FieldValue> {
        self.record.to_fields()
    }
}

/// A single analysis stamped for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub analysis: DatasetAnalysis,
}

impl AnalysisDocument {
    pub fn new(analysis: DatasetAnalysis) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            analysis,
        }
    }
}

/// Result of comparing several datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    /// Successful datasets, ordered by identifier.
    pub datasets: Vec<DatasetAnalysis>,
    /// Analysis of every successful dataset's samples concatenated.
    pub pooled: DatasetAnalysis,
    pub histogram: QualityHistogram,
    pub failures: Vec<DatasetFailure>,
}

impl ComparisonRun {
    pub fn all_failed(&self) -> bool {
        self.datasets.is_empty() && !self.failures.is_empty()
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetAnalysis> {
        self.datasets.iter().find(|d| d.name == name)
    }
}

fn build_engine(config: &AnalysisConfig) -> Result<MetricsEngine> {
    MetricsEngine::new(config.policy.clone()).context("analysis policy rejected")
}

/// Load one file and analyse it.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<DatasetAnalysis> {
    let engine = build_engine(config)?;
    let loaded = load_samples(path, config.loader.kind)?;
    let record = engine
        .compute(&loaded.values)
        .with_context(|| format!("failed to analyse '{}'", path.display()))?;
    info!(
        path = %path.display(),
        count = record.count(),
        tier = %record.tier(),
        "analysis complete"
    );
    Ok(DatasetAnalysis::new(
        path.display().to_string(),
        Some(SourceInfo::from(&loaded)),
        record,
        &engine,
    ))
}

/// Analyse samples already in memory.
pub fn analyze_samples(
    name: &str,
    samples: &[f64],
    config: &AnalysisConfig,
) -> Result<DatasetAnalysis> {
    let engine = build_engine(config)?;
    let record = engine
        .compute(samples)
        .with_context(|| format!("failed to analyse '{name}'"))?;
    Ok(DatasetAnalysis::new(name.to_string(), None, record, &engine))
}

/// Load and analyse every path, then the pooled samples.
///
/// A file that cannot be read, or whose samples the engine rejects, becomes
/// a failure entry; the remaining datasets are still analysed.
pub fn compare_files(paths: &[PathBuf], config: &AnalysisConfig) -> Result<ComparisonRun> {
    let engine = build_engine(config)?;
    let aggregator = Aggregator::new(engine.clone()).with_parallelism(config.compare.parallel);

    let mut sources: BTreeMap<String, SourceInfo> = BTreeMap::new();
    let mut inputs: Vec<(String, Result<Vec<f64>, LoadError>)> = Vec::with_capacity(paths.len());
    for path in paths {
        let identifier = path.display().to_string();
        let outcome = load_samples(path, config.loader.kind).map(|loaded| {
            sources
                .entry(identifier.clone())
                .or_insert_with(|| SourceInfo::from(&loaded));
            loaded.values
        });
        debug!(dataset = %identifier, ok = outcome.is_ok(), "dataset loaded");
        inputs.push((identifier, outcome));
    }

    let comparison = aggregator
        .aggregate(inputs)
        .context("pooled analysis failed")?;

    let datasets: Vec<DatasetAnalysis> = comparison
        .per_dataset
        .into_iter()
        .map(|(name, record)| {
            let source = sources.remove(&name);
            DatasetAnalysis::new(name, source, record, &engine)
        })
        .collect();
    let pooled = DatasetAnalysis::new(POOLED_NAME.to_string(), None, comparison.pooled, &engine);

    info!(
        succeeded = datasets.len(),
        failed = comparison.failures.len(),
        pooled_count = pooled.count(),
        "comparison complete"
    );

    Ok(ComparisonRun {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        datasets,
        pooled,
        histogram: comparison.histogram,
        failures: comparison.failures,
    })
}
