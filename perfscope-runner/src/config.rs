//! Serializable analysis configuration.
//!
//! One TOML document drives a whole session:
//!
//! ```toml
//! [policy]
//! sigma_min_count = 30
//!
//! [loader]
//! kind = "cpu"
//!
//! [report]
//! precision = 2
//!
//! [compare]
//! parallel = false
//! ```
//!
//! Every section and field is optional; missing values take their defaults.

use std::path::{Path, PathBuf};

use perfscope_core::{AnalysisPolicy, PolicyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::SampleKind;

/// Errors from reading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid analysis policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("report precision {0} is out of range (0..=12)")]
    Precision(usize),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

const MAX_PRECISION: usize = 12;

/// Complete session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub policy: AnalysisPolicy,
    pub loader: LoaderConfig,
    pub report: ReportConfig,
    pub compare: CompareConfig,
}

/// How sample files are read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Metric extracted from process-table rows.
    pub kind: SampleKind,
}

/// Report rendering options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places for every reported value.
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Multi-dataset comparison options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    /// Analyse datasets on the rayon pool.
    pub parallel: bool,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        if self.report.precision > MAX_PRECISION {
            return Err(ConfigError::Precision(self.report.precision));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.report.precision, 2);
        assert!(!config.compare.parallel);
        assert_eq!(config.loader.kind, SampleKind::Generic);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [policy]
            sigma_min_count = 40

            [loader]
            kind = "cpu"

            [compare]
            parallel = true
            "#,
        )
        .unwrap();
        assert_eq!(config.policy.sigma_min_count, 40);
        assert_eq!(config.policy.min_stats_count, 10);
        assert_eq!(config.loader.kind, SampleKind::Cpu);
        assert!(config.compare.parallel);
        assert_eq!(config.report.precision, 2);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = AnalysisConfig::default().to_toml().unwrap();
        assert!(text.contains("[policy]"));
        assert!(text.contains("[policy.quality_bands]"));
        let back = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, AnalysisConfig::default());
    }

    #[test]
    fn rejects_descending_gates() {
        let err = AnalysisConfig::from_toml_str("[policy]\nsigma_min_count = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Policy(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = AnalysisConfig::from_toml_str("[loader]\nkind = \"disk\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_excessive_precision() {
        let err = AnalysisConfig::from_toml_str("[report]\nprecision = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Precision(40)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AnalysisConfig::load(Path::new("/no/such/perfscope.toml")).unwrap_err();
        assert!(err.to_string().contains("perfscope.toml"));
    }
}
