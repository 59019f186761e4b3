//! Risk-level threshold tables
//!
//! Two incompatible threshold tables coexist deliberately: the quartile
//! table for column/dataset scores and the coarser 0.4/0.7 table for the
//! category aggregate. A third table covers the text-bias scanner. They are
//! kept as separate functions on their owning level types and must not be
//! unified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-level risk classification for column and dataset privacy scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Score below 0.25
    Low,
    /// Score in [0.25, 0.50)
    Medium,
    /// Score in [0.50, 0.75)
    High,
    /// Score of 0.75 or above
    Critical,
}

impl RiskLevel {
    /// Classify a column or dataset risk score on the quartile table
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            RiskLevel::Critical
        } else if score >= 0.50 {
            RiskLevel::High
        } else if score >= 0.25 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Three-level classification for category aggregates and bias scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryLevel {
    /// Below the medium threshold
    Low,
    /// At or above the medium threshold
    Medium,
    /// At or above the high threshold
    High,
}

impl CategoryLevel {
    /// Classify a risk-category aggregate score (HIGH >= 0.7, MEDIUM >= 0.4)
    pub fn from_category_score(score: f64) -> Self {
        if score >= 0.7 {
            CategoryLevel::High
        } else if score >= 0.4 {
            CategoryLevel::Medium
        } else {
            CategoryLevel::Low
        }
    }

    /// Classify a text-bias score (HIGH >= 0.6, MEDIUM >= 0.3)
    pub fn from_bias_score(score: f64) -> Self {
        if score >= 0.6 {
            CategoryLevel::High
        } else if score >= 0.3 {
            CategoryLevel::Medium
        } else {
            CategoryLevel::Low
        }
    }
}

impl fmt::Display for CategoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CategoryLevel::Low => "LOW",
            CategoryLevel::Medium => "MEDIUM",
            CategoryLevel::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// Severity of a fairness violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Violates the fairness threshold
    Medium,
    /// Violates the fairness threshold by a wide margin
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        };
        f.write_str(s)
    }
}
