//! Quality classifier — an ordinal label derived purely from sample count.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::QualityBands;

/// Five-level data quality scale, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    SeverelyInsufficient,
    Insufficient,
    Fair,
    Good,
    Excellent,
}

impl DataQuality {
    /// All tiers in ascending order.
    pub const ALL: [DataQuality; 5] = [
        DataQuality::SeverelyInsufficient,
        DataQuality::Insufficient,
        DataQuality::Fair,
        DataQuality::Good,
        DataQuality::Excellent,
    ];

    /// Classify a sample count. Band lower bounds are inclusive.
    pub fn classify(count: usize, bands: &QualityBands) -> Self {
        if count >= bands.excellent {
            DataQuality::Excellent
        } else if count >= bands.good {
            DataQuality::Good
        } else if count >= bands.fair {
            DataQuality::Fair
        } else if count >= bands.insufficient {
            DataQuality::Insufficient
        } else {
            DataQuality::SeverelyInsufficient
        }
    }

    /// Report label.
    pub fn label(self) -> &'static str {
        match self {
            DataQuality::SeverelyInsufficient => "严重不足",
            DataQuality::Insufficient => "不足",
            DataQuality::Fair => "一般",
            DataQuality::Good => "良好",
            DataQuality::Excellent => "优秀",
        }
    }

    /// Stable machine-readable name (matches the serde form).
    pub fn as_str(self) -> &'static str {
        match self {
            DataQuality::SeverelyInsufficient => "severely_insufficient",
            DataQuality::Insufficient => "insufficient",
            DataQuality::Fair => "fair",
            DataQuality::Good => "good",
            DataQuality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
