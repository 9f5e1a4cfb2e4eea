//! Metrics record — one tagged variant per sample-count tier.
//!
//! Each variant carries exactly the statistics valid for its tier, so
//! "is this field present" becomes a match instead of a key lookup. Higher
//! tiers embed everything lower tiers compute.
//!
//! [`MetricsRecord::to_fields`] flattens a record into the named-field map
//! downstream report and export code consumes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::IntervalAssessment;
use crate::percentile::PercentileTable;
use crate::quality::DataQuality;
use crate::sigma::SigmaTable;
use crate::stats::{Spread, Summary};

/// Sample-count tier, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Empty,
    Severe,
    Low,
    Basic,
    SigmaEligible,
    Full,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Empty => "empty",
            Tier::Severe => "severe",
            Tier::Low => "low",
            Tier::Basic => "basic",
            Tier::SigmaEligible => "sigma_eligible",
            Tier::Full => "full",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a non-empty record stopped before the statistics tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Severe,
    Low,
}

impl DataStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DataStatus::Severe => "severe",
            DataStatus::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataStatus::Severe => "严重不足 (<5)",
            DataStatus::Low => "不足 (5-9)",
        }
    }
}

/// Location statistics only; count is below the statistics gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsufficientMetrics {
    pub summary: Summary,
    pub quality: DataQuality,
}

/// Summary, spread and percentiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicMetrics {
    pub summary: Summary,
    pub spread: Spread,
    pub percentiles: PercentileTable,
    pub quality: DataQuality,
}

/// Basic metrics plus the sigma table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaMetrics {
    pub basic: BasicMetrics,
    pub sigma: SigmaTable,
}

/// Everything, including the recommended and strict intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullMetrics {
    pub basic: BasicMetrics,
    pub sigma: SigmaTable,
    pub intervals: IntervalAssessment,
}

/// Result of one engine invocation over one sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum MetricsRecord {
    Empty,
    Severe(InsufficientMetrics),
    Low(InsufficientMetrics),
    Basic(BasicMetrics),
    SigmaEligible(SigmaMetrics),
    Full(FullMetrics),
}

impl MetricsRecord {
    pub fn tier(&self) -> Tier {
        match self {
            MetricsRecord::Empty => Tier::Empty,
            MetricsRecord::Severe(_) => Tier::Severe,
            MetricsRecord::Low(_) => Tier::Low,
            MetricsRecord::Basic(_) => Tier::Basic,
            MetricsRecord::SigmaEligible(_) => Tier::SigmaEligible,
            MetricsRecord::Full(_) => Tier::Full,
        }
    }

    pub fn count(&self) -> usize {
        self.summary().map_or(0, |s| s.count)
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            MetricsRecord::Empty => None,
            MetricsRecord::Severe(m) | MetricsRecord::Low(m) => Some(&m.summary),
            _ => self.basic().map(|b| &b.summary),
        }
    }

    /// Basic-tier statistics, present from `Basic` upwards.
    pub fn basic(&self) -> Option<&BasicMetrics> {
        match self {
            MetricsRecord::Basic(b) => Some(b),
            MetricsRecord::SigmaEligible(m) => Some(&m.basic),
            MetricsRecord::Full(m) => Some(&m.basic),
            _ => None,
        }
    }

    pub fn spread(&self) -> Option<&Spread> {
        self.basic().map(|b| &b.spread)
    }

    pub fn percentiles(&self) -> Option<&PercentileTable> {
        self.basic().map(|b| &b.percentiles)
    }

    pub fn sigma(&self) -> Option<&SigmaTable> {
        match self {
            MetricsRecord::SigmaEligible(m) => Some(&m.sigma),
            MetricsRecord::Full(m) => Some(&m.sigma),
            _ => None,
        }
    }

    pub fn intervals(&self) -> Option<&IntervalAssessment> {
        match self {
            MetricsRecord::Full(m) => Some(&m.intervals),
            _ => None,
        }
    }

    pub fn quality(&self) -> Option<DataQuality> {
        match self {
            MetricsRecord::Empty => None,
            MetricsRecord::Severe(m) | MetricsRecord::Low(m) => Some(m.quality),
            _ => self.basic().map(|b| b.quality),
        }
    }

    /// True below the statistics gate, including the empty record.
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            MetricsRecord::Empty | MetricsRecord::Severe(_) | MetricsRecord::Low(_)
        )
    }

    pub fn data_status(&self) -> Option<DataStatus> {
        match self {
            MetricsRecord::Severe(_) => Some(DataStatus::Severe),
            MetricsRecord::Low(_) => Some(DataStatus::Low),
            _ => None,
        }
    }

    /// Flatten into the named-field map (`count`, `mean`, `p95`,
    /// `sigma_3_lower`, `within_recommended`, ...).
    pub fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        let mut fields = BTreeMap::new();
        let mut put = |name: &str, value: FieldValue| {
            fields.insert(name.to_string(), value);
        };

        put("count", FieldValue::Integer(self.count() as u64));
        if self.is_insufficient() {
            put("insufficient_data", FieldValue::Flag(true));
        }
        if let Some(status) = self.data_status() {
            put("data_status", FieldValue::Text(status.as_str().into()));
        }
        if let Some(s) = self.summary() {
            put("mean", FieldValue::Number(s.mean));
            put("median", FieldValue::Number(s.median));
            put("min", FieldValue::Number(s.min));
            put("max", FieldValue::Number(s.max));
        }
        if let Some(spread) = self.spread() {
            put("std", FieldValue::Number(spread.std));
            put("variance", FieldValue::Number(spread.variance));
        }
        if let Some(table) = self.percentiles() {
            for row in table.iter() {
                put(&format!("p{}", row.level), FieldValue::Number(row.value));
            }
        }
        if let Some(table) = self.sigma() {
            for row in table.iter() {
                put(&format!("sigma_{}_lower", row.k), FieldValue::Number(row.lower));
                put(&format!("sigma_{}_upper", row.k), FieldValue::Number(row.upper));
                put(&format!("within_{}sigma", row.k), FieldValue::Number(row.within));
            }
        }
        if let Some(iv) = self.intervals() {
            let rec = &iv.recommended;
            put("recommended_lower", FieldValue::Number(rec.lower));
            put("recommended_upper", FieldValue::Number(rec.upper));
            put("within_recommended", FieldValue::Number(rec.within));
            put("interval_method", FieldValue::Text(rec.method.label().into()));
            let strict = &iv.strict;
            put("strict_lower", FieldValue::Number(strict.lower));
            put("strict_upper", FieldValue::Number(strict.upper));
            put("within_strict", FieldValue::Number(strict.within));
            put("strict_method", FieldValue::Text(strict.method.label().into()));
        }
        // Records below the statistics gate expose quality through
        // `quality()` only; their flattened form is location plus status.
        if let Some(quality) = self.basic().map(|b| b.quality) {
            put("data_quality", FieldValue::Text(quality.label().into()));
        }
        fields
    }
}

/// A flattened field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u64),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Flag(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}
