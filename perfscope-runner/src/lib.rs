//! perfscope Runner — file acquisition, configuration, sessions, reports and
//! export around the core metrics engine.
//!
//! - `loader`: process-table and plain-text sample files
//! - `config`: TOML analysis configuration
//! - `session`: single-file analysis and multi-file comparison
//! - `report`: plain-text and Markdown reports
//! - `export`: JSON (schema-versioned) and CSV output

pub mod config;
pub mod export;
pub mod loader;
pub mod report;
pub mod session;

pub use config::{AnalysisConfig, CompareConfig, ConfigError, LoaderConfig, ReportConfig};
pub use export::{
    export_analysis_csv, export_analysis_json, export_csv, export_json, import_analysis_json,
    import_json,
};
pub use loader::{
    fingerprint, load_samples, parse_samples, LoadError, LoadedSamples, ParsedSamples, SampleKind,
    SourceFormat,
};
pub use report::{
    Block, MarkdownReportGenerator, ReportRenderer, ReportStyle, TextReportGenerator,
};
pub use session::{
    analyze_file, analyze_samples, compare_files, AnalysisDocument, ComparisonRun,
    DatasetAnalysis, SourceInfo, POOLED_NAME, SCHEMA_VERSION,
};
