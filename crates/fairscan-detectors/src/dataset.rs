//! Dataset-level risk aggregation
//!
//! Folds per-column results into one dataset score (unweighted mean, not
//! row-count weighted), flags high-risk and PII-bearing columns, and buckets
//! detected entity types into direct and quasi identifiers. Aggregation
//! fails explicitly on an empty dataset instead of dividing by zero.

use crate::column::{ColumnRiskResult, ColumnRiskScorer};
use crate::model::TextCategoryClassifier;
use fairscan_core::{Dataset, EntityType, Error, Result, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Score threshold above which a column counts as high-risk
const HIGH_RISK_THRESHOLD: f64 = 0.5;

/// One detected identifier occurrence in a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierFinding {
    /// Column the entity was detected in
    pub column: String,

    /// Detected entity type
    pub entity_type: EntityType,
}

/// Dataset-level privacy risk report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRiskReport {
    /// Dataset name
    pub dataset_name: String,

    /// Row count of the analyzed dataset
    pub total_rows: usize,

    /// Column count of the analyzed dataset
    pub total_columns: usize,

    /// Which detection path produced this report
    pub analysis_method: String,

    /// Whether the learned classifier contributed
    pub model_trained: bool,

    /// Per-column analysis keyed by column name
    pub column_analysis: BTreeMap<String, ColumnRiskResult>,

    /// Unweighted mean of column risk scores
    pub risk_score: f64,

    /// Level derived from `risk_score` on the quartile table
    pub risk_level: RiskLevel,

    /// Columns with risk score at or above 0.5
    pub high_risk_columns: Vec<String>,

    /// Columns with any entity match, independent of score
    pub pii_columns: Vec<String>,

    /// Detected direct identifiers per column
    pub direct_identifiers: Vec<IdentifierFinding>,

    /// Detected quasi identifiers per column
    pub quasi_identifiers: Vec<IdentifierFinding>,

    /// Reviewer guidance derived from the findings
    pub recommendations: Vec<String>,
}

/// Aggregates per-column scores into a dataset report
pub struct DatasetRiskAggregator {
    scorer: ColumnRiskScorer,
}

impl DatasetRiskAggregator {
    /// Create an aggregator with a fresh column scorer
    pub fn new() -> Result<Self> {
        Ok(Self {
            scorer: ColumnRiskScorer::new()?,
        })
    }

    /// Analyze every column and fold the results into a dataset report
    pub fn aggregate(
        &self,
        dataset: &Dataset,
        classifier: &TextCategoryClassifier,
    ) -> Result<DatasetRiskReport> {
        if dataset.is_empty() {
            return Err(Error::empty_dataset(format!(
                "dataset '{}' has no rows or no columns to aggregate",
                dataset.name
            )));
        }

        let mut column_analysis = BTreeMap::new();
        let mut high_risk_columns = Vec::new();
        let mut pii_columns = Vec::new();
        let mut direct_identifiers = Vec::new();
        let mut quasi_identifiers = Vec::new();
        let mut score_sum = 0.0;

        for column in &dataset.columns {
            let result = self.scorer.score_column(column, classifier)?;
            score_sum += result.risk_score;

            if result.risk_score >= HIGH_RISK_THRESHOLD {
                high_risk_columns.push(column.name.clone());
            }

            if result.pii_detected {
                pii_columns.push(column.name.clone());
                for entity_type in result.entity_counts.keys() {
                    let finding = IdentifierFinding {
                        column: column.name.clone(),
                        entity_type: *entity_type,
                    };
                    if entity_type.is_direct_identifier() {
                        direct_identifiers.push(finding);
                    } else if entity_type.is_quasi_identifier() {
                        quasi_identifiers.push(finding);
                    }
                }
            }

            column_analysis.insert(column.name.clone(), result);
        }

        let risk_score = crate::column::round3(score_sum / dataset.column_count() as f64);
        let risk_level = RiskLevel::from_score(risk_score);

        info!(
            dataset = %dataset.name,
            columns = dataset.column_count(),
            risk_score,
            %risk_level,
            "aggregated dataset risk"
        );

        let recommendations = build_recommendations(
            &high_risk_columns,
            &direct_identifiers,
            &quasi_identifiers,
        );

        Ok(DatasetRiskReport {
            dataset_name: dataset.name.clone(),
            total_rows: dataset.row_count(),
            total_columns: dataset.column_count(),
            analysis_method: "pattern_classifier".to_string(),
            model_trained: classifier.is_trained(),
            column_analysis,
            risk_score,
            risk_level,
            high_risk_columns,
            pii_columns,
            direct_identifiers,
            quasi_identifiers,
            recommendations,
        })
    }
}

fn build_recommendations(
    high_risk_columns: &[String],
    direct_identifiers: &[IdentifierFinding],
    quasi_identifiers: &[IdentifierFinding],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !direct_identifiers.is_empty() {
        recommendations.push(format!(
            "CRITICAL: {} direct identifiers found. Remove or hash these columns immediately (GDPR Art. 5)",
            direct_identifiers.len()
        ));
    }

    if !high_risk_columns.is_empty() {
        recommendations.push(format!(
            "HIGH RISK: {} columns flagged. Apply anonymization techniques (GDPR Art. 32)",
            high_risk_columns.len()
        ));
    }

    if !quasi_identifiers.is_empty() {
        recommendations.push(
            "Quasi-identifiers detected. Consider k-anonymity or l-diversity".to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push(
            "No critical privacy risks detected. Dataset appears compliant".to_string(),
        );
    }

    recommendations
}
