//! Analysis configuration
//!
//! Serde-derived settings loadable from YAML. Every field has a default so
//! a partial (or empty) file is valid.

use crate::orchestrator::AnalysisMode;
use fairscan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one orchestrated analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Operating mode (fast / accurate / hybrid)
    pub mode: AnalysisMode,

    /// Protected attribute column names for fairness scoring
    pub protected_attributes: Vec<String>,

    /// Target/label column name for data-quality checks
    pub target_column: Option<String>,

    /// Optional pre-trained classifier artifact to load at startup
    pub model_artifact_path: Option<PathBuf>,

    /// Interpretability estimate fed to the ethical risk category
    pub transparency_score: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Hybrid,
            protected_attributes: Vec::new(),
            target_column: None,
            model_artifact_path: None,
            transparency_score: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid analysis config: {e}")))
    }

    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&yaml)
    }
}
