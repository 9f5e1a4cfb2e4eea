//! Export — JSON and CSV renderings of analyses and comparisons.
//!
//! JSON documents carry a `schema_version`; newer versions are rejected on
//! import. CSV output has one row per dataset (plus the pooled row for
//! comparisons) and one column per flattened record field.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Context, Result};
use perfscope_core::FieldValue;

use crate::session::{AnalysisDocument, ComparisonRun, DatasetAnalysis, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a comparison to pretty JSON.
pub fn export_json(run: &ComparisonRun) -> Result<String> {
    serde_json::to_string_pretty(run).context("failed to serialize ComparisonRun to JSON")
}

/// Deserialize a comparison, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ComparisonRun> {
    let run: ComparisonRun =
        serde_json::from_str(json).context("failed to deserialize ComparisonRun from JSON")?;
    check_version(run.schema_version)?;
    Ok(run)
}

/// Serialize one analysis, stamped with the schema version and time.
pub fn export_analysis_json(analysis: &DatasetAnalysis) -> Result<String> {
    let document = AnalysisDocument::new(analysis.clone());
    serde_json::to_string_pretty(&document).context("failed to serialize analysis to JSON")
}

pub fn import_analysis_json(json: &str) -> Result<AnalysisDocument> {
    let document: AnalysisDocument =
        serde_json::from_str(json).context("failed to deserialize analysis from JSON")?;
    check_version(document.schema_version)?;
    Ok(document)
}

fn check_version(version: u32) -> Result<()> {
    if version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            version,
            SCHEMA_VERSION
        );
    }
    Ok(())
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per dataset followed by the pooled row.
///
/// Columns: `dataset`, then the union of every row's field names in
/// lexical order. Fields a row lacks are left empty.
pub fn export_csv(run: &ComparisonRun) -> Result<String> {
    let rows: Vec<(&str, BTreeMap<String, FieldValue>)> = run
        .datasets
        .iter()
        .chain(std::iter::once(&run.pooled))
        .map(|d| (d.name.as_str(), d.fields()))
        .collect();
    write_rows(&rows)
}

/// A single-row CSV of one analysis.
pub fn export_analysis_csv(analysis: &DatasetAnalysis) -> Result<String> {
    write_rows(&[(analysis.name.as_str(), analysis.fields())])
}

fn write_rows(rows: &[(&str, BTreeMap<String, FieldValue>)]) -> Result<String> {
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|(_, fields)| fields.keys().map(String::as_str))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(std::iter::once("dataset").chain(columns.iter().copied()))?;
    for (name, fields) in rows {
        let mut record = vec![name.to_string()];
        record.extend(
            columns
                .iter()
                .map(|c| fields.get(*c).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
