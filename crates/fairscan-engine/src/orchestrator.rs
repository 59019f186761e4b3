//! Analysis orchestration
//!
//! Routes work between the always-available fast backend and an optional
//! deep backend. In hybrid mode the fast pass screens the whole dataset and
//! the deep backend only sees the columns the fast pass flagged; its
//! findings are attached onto the flagged columns of the fast report. A
//! deep backend that fails to construct downgrades the orchestrator to fast
//! mode permanently; the failure is recorded once, never retried.

use crate::compliance::{assess_gdpr_compliance, ComplianceVerdict};
use crate::config::AnalysisConfig;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::risk::{RiskCategoryAggregator, RiskCategoryReport};
use chrono::{DateTime, Utc};
use fairscan_core::{Dataset, Error, Result};
use fairscan_detectors::{
    DatasetRiskReport, DeepColumnFindings, DetectionBackend, FastBackend, TextBiasReport,
};
use fairscan_fairness::{EvalSet, FairnessReport, FairnessScorer, ModelMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrator operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Pattern + classifier path only
    Fast,
    /// Deep backend only
    Accurate,
    /// Fast screening with deep escalation on flagged columns
    Hybrid,
}

impl AnalysisMode {
    /// Stable string form used in reports and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Fast => "fast",
            AnalysisMode::Accurate => "accurate",
            AnalysisMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fast" => Ok(AnalysisMode::Fast),
            "accurate" => Ok(AnalysisMode::Accurate),
            "hybrid" => Ok(AnalysisMode::Hybrid),
            other => Err(Error::UnsupportedMode(other.to_string())),
        }
    }
}

/// Privacy-risk output of one orchestrated call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysisOutput {
    /// Dataset report with `analysis_method` set to the path that ran
    pub report: DatasetRiskReport,

    /// Wall-clock duration of the call
    pub analysis_time_ms: u64,
}

/// Bias output of one orchestrated call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasAnalysisOutput {
    /// Protected-attribute text scan, always computed
    pub text_report: TextBiasReport,

    /// Statistical fairness metrics; requires predictions and a non-fast mode
    pub statistical: Option<FairnessReport>,

    /// Wall-clock duration of the call
    pub analysis_time_ms: u64,
}

/// Inputs for a full analysis run
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    /// Dataset under analysis; never mutated
    pub dataset: &'a Dataset,

    /// Protected attribute column names; missing ones are skipped
    pub protected_attributes: &'a [String],

    /// Target/label column name for data-quality checks
    pub target_column: &'a str,

    /// Row-aligned predictions for fairness scoring
    pub eval: Option<&'a EvalSet>,

    /// Pre-computed model metrics for the performance risk category
    pub model_metrics: Option<&'a ModelMetrics>,
}

/// Combined output of a full analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallReport {
    /// Unique report id
    pub report_id: Uuid,

    /// Report creation time
    pub generated_at: DateTime<Utc>,

    /// Mode the run actually executed under (after any downgrade)
    pub analysis_mode: AnalysisMode,

    /// Dataset name
    pub dataset_name: String,

    /// Row count of the analyzed dataset
    pub total_rows: usize,

    /// Column count of the analyzed dataset
    pub total_columns: usize,

    /// Privacy risk analysis
    pub risk_analysis: RiskAnalysisOutput,

    /// Bias analysis (text scan plus optional statistical fairness)
    pub bias_analysis: BiasAnalysisOutput,

    /// Five-category risk aggregation
    pub risk_categories: RiskCategoryReport,

    /// GDPR verdict over the privacy and text-bias findings
    pub gdpr_compliance: ComplianceVerdict,

    /// Sum of the risk and bias call durations
    pub total_time_ms: u64,
}

/// Routes analysis between the fast and deep backends
pub struct AnalysisOrchestrator {
    mode: AnalysisMode,
    fast: FastBackend,
    deep: Option<Box<dyn DetectionBackend>>,
    scanner: fairscan_detectors::ProtectedAttributeScanner,
    fairness: FairnessScorer,
    aggregator: RiskCategoryAggregator,
    sink: Option<Box<dyn ProgressSink>>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator without a deep backend
    ///
    /// Accurate and hybrid modes need one; requesting them here downgrades
    /// to fast immediately.
    pub fn new(mode: AnalysisMode) -> Result<Self> {
        Self::build(mode, None::<fn() -> Result<Box<dyn DetectionBackend>>>)
    }

    /// Create an orchestrator, constructing the deep backend via `factory`
    ///
    /// The factory runs at most once. If it fails, the orchestrator
    /// downgrades to fast mode for its whole lifetime.
    pub fn with_backend<F>(mode: AnalysisMode, factory: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Box<dyn DetectionBackend>>,
    {
        Self::build(mode, Some(factory))
    }

    /// Create an orchestrator from a configuration, loading the classifier
    /// artifact when one is configured
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let mut orchestrator = Self::new(config.mode)?;
        orchestrator.aggregator = RiskCategoryAggregator::new()?
            .with_transparency(config.transparency_score);
        if let Some(path) = &config.model_artifact_path {
            orchestrator.fast.classifier_mut().load(path)?;
        }
        Ok(orchestrator)
    }

    fn build<F>(mode: AnalysisMode, factory: Option<F>) -> Result<Self>
    where
        F: FnOnce() -> Result<Box<dyn DetectionBackend>>,
    {
        let mut orchestrator = Self {
            mode,
            fast: FastBackend::new()?,
            deep: None,
            scanner: fairscan_detectors::ProtectedAttributeScanner::new()?,
            fairness: FairnessScorer::new(),
            aggregator: RiskCategoryAggregator::new()?,
            sink: None,
        };

        if matches!(mode, AnalysisMode::Accurate | AnalysisMode::Hybrid) {
            let attempt = match factory {
                Some(factory) => factory(),
                None => Err(Error::backend(
                    "no deep backend configured".to_string(),
                )),
            };
            match attempt {
                Ok(backend) => {
                    info!(backend = backend.name(), %mode, "deep backend initialized");
                    orchestrator.deep = Some(backend);
                }
                Err(e) => {
                    warn!(error = %e, "deep backend unavailable, downgrading to fast mode");
                    Self::emit(
                        &mut orchestrator.sink,
                        ProgressEvent::BackendDowngraded {
                            reason: e.to_string(),
                        },
                    );
                    orchestrator.mode = AnalysisMode::Fast;
                }
            }
        }

        Ok(orchestrator)
    }

    /// Attach a progress sink
    pub fn with_progress_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Mode the orchestrator currently runs under
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Train the fast backend's classifier on a labelled corpus
    pub fn train(&mut self, corpus: &[(String, String)]) -> Result<()> {
        self.fast.train(corpus)
    }

    /// Run the privacy risk analysis under the current mode
    pub fn analyze_risk(&mut self, dataset: &Dataset) -> Result<RiskAnalysisOutput> {
        let start = Instant::now();
        Self::emit(
            &mut self.sink,
            ProgressEvent::AnalysisStarted {
                mode: self.mode.to_string(),
            },
        );

        let report = match (self.mode, &self.deep) {
            (AnalysisMode::Accurate, Some(deep)) => {
                let mut report = deep.analyze_dataset(dataset)?;
                report.analysis_method = deep.name().to_string();
                report
            }
            (AnalysisMode::Hybrid, Some(deep)) => {
                let fast_report = self.fast.analyze_dataset(dataset)?;
                Self::emit(
                    &mut self.sink,
                    ProgressEvent::FastScreeningCompleted {
                        risk_level: fast_report.risk_level,
                        high_risk_columns: fast_report.high_risk_columns.len(),
                    },
                );
                if fast_report.high_risk_columns.is_empty() {
                    let mut report = fast_report;
                    report.analysis_method = "pattern_only".to_string();
                    report
                } else {
                    Self::emit(
                        &mut self.sink,
                        ProgressEvent::DeepAnalysisStarted {
                            backend: deep.name().to_string(),
                            columns: fast_report.high_risk_columns.len(),
                        },
                    );
                    let flagged = dataset.select(&fast_report.high_risk_columns);
                    let deep_report = deep.analyze_dataset(&flagged)?;
                    merge_deep_findings(fast_report, &deep_report, deep.name())
                }
            }
            // fast mode, or a requested deep mode after downgrade
            _ => {
                let mut report = self.fast.analyze_dataset(dataset)?;
                report.analysis_method = self.fast.name().to_string();
                report
            }
        };

        let analysis_time_ms = start.elapsed().as_millis() as u64;
        Self::emit(
            &mut self.sink,
            ProgressEvent::AnalysisCompleted {
                analysis_method: report.analysis_method.clone(),
                elapsed_ms: analysis_time_ms,
            },
        );

        Ok(RiskAnalysisOutput {
            report,
            analysis_time_ms,
        })
    }

    /// Run the bias analysis under the current mode
    ///
    /// The protected-attribute text scan always runs; statistical fairness
    /// additionally runs in accurate/hybrid mode when predictions are
    /// supplied.
    pub fn analyze_bias(
        &mut self,
        dataset: &Dataset,
        eval: Option<(&EvalSet, &[String])>,
    ) -> Result<BiasAnalysisOutput> {
        let start = Instant::now();

        let mut text_report = self.scanner.analyze_dataset(dataset)?;

        let statistical = match (self.mode, eval) {
            (AnalysisMode::Fast, _) | (_, None) => None,
            (_, Some((eval, attributes))) => {
                if attributes.is_empty() {
                    None
                } else {
                    Some(self.fairness.analyze(dataset, eval, attributes)?)
                }
            }
        };

        text_report.analysis_method = if statistical.is_some() {
            "hybrid_pattern_statistical".to_string()
        } else {
            "pattern_matching".to_string()
        };

        Ok(BiasAnalysisOutput {
            text_report,
            statistical,
            analysis_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run the complete risk + bias + category + compliance analysis
    pub fn analyze_full(&mut self, request: AnalysisRequest<'_>) -> Result<OverallReport> {
        let risk_analysis = self.analyze_risk(request.dataset)?;
        let bias_analysis = self.analyze_bias(
            request.dataset,
            request.eval.map(|eval| (eval, request.protected_attributes)),
        )?;

        let risk_categories = self.aggregator.analyze(
            request.dataset,
            request.target_column,
            bias_analysis.statistical.as_ref(),
            request.model_metrics,
        )?;

        let gdpr_compliance =
            assess_gdpr_compliance(&risk_analysis.report, &bias_analysis.text_report);

        let total_time_ms = risk_analysis.analysis_time_ms + bias_analysis.analysis_time_ms;
        info!(
            dataset = %request.dataset.name,
            mode = %self.mode,
            compliant = gdpr_compliance.compliant,
            total_time_ms,
            "completed full analysis"
        );

        Ok(OverallReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            analysis_mode: self.mode,
            dataset_name: request.dataset.name.clone(),
            total_rows: request.dataset.row_count(),
            total_columns: request.dataset.column_count(),
            risk_analysis,
            bias_analysis,
            risk_categories,
            gdpr_compliance,
            total_time_ms,
        })
    }

    fn emit(sink: &mut Option<Box<dyn ProgressSink>>, event: ProgressEvent) {
        if let Some(sink) = sink {
            sink.emit(&event);
        }
    }
}

/// Attach deep-backend column findings onto the flagged fast-report columns
fn merge_deep_findings(
    mut fast_report: DatasetRiskReport,
    deep_report: &DatasetRiskReport,
    backend_name: &str,
) -> DatasetRiskReport {
    for column in fast_report.high_risk_columns.clone() {
        if let Some(deep_result) = deep_report.column_analysis.get(&column) {
            if let Some(entry) = fast_report.column_analysis.get_mut(&column) {
                entry.deep_findings = Some(Box::new(DeepColumnFindings {
                    backend: backend_name.to_string(),
                    result: deep_result.clone(),
                }));
            }
        }
    }
    fast_report.analysis_method = format!("hybrid_pattern_{backend_name}");
    fast_report
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairscan_core::{Column, Value};

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("fast".parse::<AnalysisMode>().unwrap(), AnalysisMode::Fast);
        assert_eq!(
            "hybrid".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::Hybrid
        );
        let err = "turbo".parse::<AnalysisMode>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode(_)));
    }

    #[test]
    fn test_requested_deep_mode_without_backend_downgrades() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisMode::Hybrid).unwrap();
        assert_eq!(orchestrator.mode(), AnalysisMode::Fast);
    }

    #[test]
    fn test_fast_mode_tags_report() {
        let mut orchestrator = AnalysisOrchestrator::new(AnalysisMode::Fast).unwrap();
        let dataset = Dataset::new(
            "t",
            vec![text_column("email", &["a@b.com", "c@d.org"])],
        );

        let output = orchestrator.analyze_risk(&dataset).unwrap();
        assert_eq!(output.report.analysis_method, "fast_pattern");
    }

    #[test]
    fn test_fast_mode_skips_statistical_bias() {
        let mut orchestrator = AnalysisOrchestrator::new(AnalysisMode::Fast).unwrap();
        let dataset = Dataset::new(
            "t",
            vec![text_column("gender", &["a", "a", "b", "b"])],
        );
        let eval = EvalSet::new(vec![1, 0, 1, 0], vec![1, 0, 1, 0]).unwrap();
        let attributes = vec!["gender".to_string()];

        let output = orchestrator
            .analyze_bias(&dataset, Some((&eval, &attributes)))
            .unwrap();
        assert!(output.statistical.is_none());
        assert_eq!(output.text_report.analysis_method, "pattern_matching");
    }
}
