//! Group fairness scoring
//!
//! For each protected attribute the first-seen group is the reference and
//! the second-seen group the comparison; attributes with more than two
//! groups are scored on those first two only. Three metrics are computed
//! per attribute:
//!
//! - disparate impact: comparison selection rate over reference selection
//!   rate, fair within [0.8, 1.25] (the four-fifths rule and its inverse)
//! - statistical parity difference: comparison minus reference selection
//!   rate, fair within |0.1|
//! - equal opportunity difference: comparison minus reference true positive
//!   rate, fair within |0.1|
//!
//! The overall assessment passes only with zero HIGH violations and at most
//! one MEDIUM violation across all attributes.

use crate::demographics::{demographic_disparity, DemographicDisparityReport};
use crate::metrics::{group_metrics, EvalSet, GroupMetrics};
use fairscan_core::{CategoryLevel, Column, Dataset, Error, Result, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Disparate-impact fair band (four-fifths rule, both directions)
const DI_FAIR_LOW: f64 = 0.8;
const DI_FAIR_HIGH: f64 = 1.25;

/// Absolute fair band for parity and opportunity differences
const DIFFERENCE_FAIR_BAND: f64 = 0.1;

/// Disparate-impact bounds past which a violation is HIGH severity
const DI_SEVERE_LOW: f64 = 0.5;
const DI_SEVERE_HIGH: f64 = 2.0;

/// Absolute difference past which a violation is HIGH severity
const DIFFERENCE_SEVERE: f64 = 0.2;

/// Parity and opportunity differences scale by 5 toward the unit sub-score
const DIFFERENCE_SCORE_SCALE: f64 = 5.0;

/// One failed fairness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessViolation {
    /// Protected attribute the check ran on
    pub attribute: String,

    /// Metric name: `disparate_impact`, `statistical_parity_difference`,
    /// or `equal_opportunity_difference`
    pub metric: String,

    /// Observed metric value
    pub value: f64,

    /// Fair-band boundary the value was checked against
    pub threshold: f64,

    /// Violation severity
    pub severity: Severity,

    /// Human-readable description of the failed check
    pub description: String,
}

/// Fairness metrics for a single protected attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeFairness {
    /// Protected attribute column name
    pub attribute: String,

    /// First-seen group, the denominator for disparate impact
    pub reference_group: String,

    /// Second-seen group
    pub comparison_group: String,

    /// All groups of the attribute, first-seen order
    pub group_metrics: Vec<GroupMetrics>,

    /// Comparison over reference selection rate; 0 when reference rate is 0
    pub disparate_impact: f64,

    /// Comparison minus reference selection rate
    pub statistical_parity_difference: f64,

    /// Comparison minus reference true positive rate
    pub equal_opportunity_difference: f64,
}

/// Dataset-level fairness report across all requested attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessReport {
    /// Dataset name
    pub dataset_name: String,

    /// Attributes that were actually analyzed (present, two or more groups)
    pub analyzed_attributes: Vec<String>,

    /// Requested attributes skipped (missing column or fewer than two groups)
    pub skipped_attributes: Vec<String>,

    /// Per-attribute metrics keyed by attribute name
    pub attribute_analysis: BTreeMap<String, AttributeFairness>,

    /// Descriptive per-group disparity breakdown per analyzed attribute
    pub demographic_analysis: BTreeMap<String, DemographicDisparityReport>,

    /// All failed checks across all attributes
    pub violations: Vec<FairnessViolation>,

    /// True with zero HIGH and at most one MEDIUM violation
    pub passes_fairness_checks: bool,

    /// Mean of the unit sub-scores across all analyzed attributes
    pub bias_score: f64,

    /// Level derived from `bias_score`
    pub bias_level: CategoryLevel,

    /// Reviewer guidance derived from the violations
    pub recommendations: Vec<String>,
}

/// Scores group fairness of predictions over protected attributes
#[derive(Debug, Default)]
pub struct FairnessScorer;

impl FairnessScorer {
    /// Create a scorer
    pub fn new() -> Self {
        Self
    }

    /// Analyze predictions against the named protected attributes
    ///
    /// Attributes missing from the dataset are skipped rather than failing
    /// the whole run; a column whose length disagrees with the evaluation
    /// set is an error.
    pub fn analyze(
        &self,
        dataset: &Dataset,
        eval: &EvalSet,
        protected_attributes: &[String],
    ) -> Result<FairnessReport> {
        if protected_attributes.is_empty() {
            return Err(Error::config(
                "no protected attributes requested for fairness analysis".to_string(),
            ));
        }

        let mut analyzed_attributes = Vec::new();
        let mut skipped_attributes = Vec::new();
        let mut attribute_analysis = BTreeMap::new();
        let mut demographic_analysis = BTreeMap::new();
        let mut violations = Vec::new();
        let mut sub_scores = Vec::new();

        for attribute in protected_attributes {
            let Some(column) = dataset.column(attribute) else {
                debug!(%attribute, "protected attribute not present, skipping");
                skipped_attributes.push(attribute.clone());
                continue;
            };

            let labels = render_labels(column, eval.len())?;
            let metrics = group_metrics(eval, &labels)?;
            if metrics.len() < 2 {
                debug!(%attribute, groups = metrics.len(), "fewer than two groups, skipping");
                skipped_attributes.push(attribute.clone());
                continue;
            }

            let analysis = score_attribute(attribute, metrics);
            violations.extend(check_violations(&analysis));
            sub_scores.extend(attribute_sub_scores(&analysis));
            demographic_analysis.insert(attribute.clone(), demographic_disparity(eval, column)?);
            analyzed_attributes.push(attribute.clone());
            attribute_analysis.insert(attribute.clone(), analysis);
        }

        let high = violations
            .iter()
            .filter(|v| v.severity == Severity::High)
            .count();
        let medium = violations.len() - high;
        let passes_fairness_checks = high == 0 && medium <= 1;

        let bias_score = if sub_scores.is_empty() {
            0.0
        } else {
            round3(sub_scores.iter().sum::<f64>() / sub_scores.len() as f64)
        };
        let bias_level = CategoryLevel::from_bias_score(bias_score);

        info!(
            dataset = %dataset.name,
            attributes = analyzed_attributes.len(),
            violations = violations.len(),
            bias_score,
            passes = passes_fairness_checks,
            "scored group fairness"
        );

        let recommendations = build_recommendations(&violations, passes_fairness_checks);

        Ok(FairnessReport {
            dataset_name: dataset.name.clone(),
            analyzed_attributes,
            skipped_attributes,
            attribute_analysis,
            demographic_analysis,
            violations,
            passes_fairness_checks,
            bias_score,
            bias_level,
            recommendations,
        })
    }
}

fn render_labels(column: &Column, expected_rows: usize) -> Result<Vec<String>> {
    if column.len() != expected_rows {
        return Err(Error::config(format!(
            "protected attribute '{}' has {} rows but evaluation set has {}",
            column.name,
            column.len(),
            expected_rows
        )));
    }
    Ok(column.values.iter().map(|v| v.render()).collect())
}

fn score_attribute(attribute: &str, metrics: Vec<GroupMetrics>) -> AttributeFairness {
    let reference = &metrics[0];
    let comparison = &metrics[1];

    let disparate_impact = if reference.positive_rate == 0.0 {
        0.0
    } else {
        comparison.positive_rate / reference.positive_rate
    };

    AttributeFairness {
        attribute: attribute.to_string(),
        reference_group: reference.group_label.clone(),
        comparison_group: comparison.group_label.clone(),
        disparate_impact: round3(disparate_impact),
        statistical_parity_difference: round3(
            comparison.positive_rate - reference.positive_rate,
        ),
        equal_opportunity_difference: round3(
            comparison.true_positive_rate - reference.true_positive_rate,
        ),
        group_metrics: metrics,
    }
}

fn check_violations(analysis: &AttributeFairness) -> Vec<FairnessViolation> {
    let mut violations = Vec::new();

    let di = analysis.disparate_impact;
    if !(DI_FAIR_LOW..=DI_FAIR_HIGH).contains(&di) {
        let severity = if di < DI_SEVERE_LOW || di > DI_SEVERE_HIGH {
            Severity::High
        } else {
            Severity::Medium
        };
        violations.push(FairnessViolation {
            attribute: analysis.attribute.clone(),
            metric: "disparate_impact".to_string(),
            value: di,
            threshold: DI_FAIR_LOW,
            severity,
            description: format!(
                "disparate impact {di:.3} for '{}' vs '{}' is outside [{DI_FAIR_LOW}, {DI_FAIR_HIGH}]",
                analysis.comparison_group, analysis.reference_group
            ),
        });
    }

    let spd = analysis.statistical_parity_difference;
    if spd.abs() >= DIFFERENCE_FAIR_BAND {
        violations.push(FairnessViolation {
            attribute: analysis.attribute.clone(),
            metric: "statistical_parity_difference".to_string(),
            value: spd,
            threshold: DIFFERENCE_FAIR_BAND,
            severity: difference_severity(spd),
            description: format!(
                "statistical parity difference {spd:.3} for '{}' vs '{}' exceeds |{DIFFERENCE_FAIR_BAND}|",
                analysis.comparison_group, analysis.reference_group
            ),
        });
    }

    let eod = analysis.equal_opportunity_difference;
    if eod.abs() >= DIFFERENCE_FAIR_BAND {
        violations.push(FairnessViolation {
            attribute: analysis.attribute.clone(),
            metric: "equal_opportunity_difference".to_string(),
            value: eod,
            threshold: DIFFERENCE_FAIR_BAND,
            severity: difference_severity(eod),
            description: format!(
                "equal opportunity difference {eod:.3} for '{}' vs '{}' exceeds |{DIFFERENCE_FAIR_BAND}|",
                analysis.comparison_group, analysis.reference_group
            ),
        });
    }

    violations
}

fn difference_severity(value: f64) -> Severity {
    if value.abs() > DIFFERENCE_SEVERE {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn attribute_sub_scores(analysis: &AttributeFairness) -> [f64; 3] {
    [
        (1.0 - analysis.disparate_impact).abs().min(1.0),
        (analysis.statistical_parity_difference.abs() * DIFFERENCE_SCORE_SCALE).min(1.0),
        (analysis.equal_opportunity_difference.abs() * DIFFERENCE_SCORE_SCALE).min(1.0),
    ]
}

fn build_recommendations(
    violations: &[FairnessViolation],
    passes: bool,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if violations
        .iter()
        .any(|v| v.metric == "disparate_impact")
    {
        recommendations.push(
            "Disparate impact violation: rebalance training data or apply reweighting so selection rates satisfy the four-fifths rule"
                .to_string(),
        );
    }

    if violations
        .iter()
        .any(|v| v.metric == "statistical_parity_difference")
    {
        recommendations.push(
            "Statistical parity violation: audit features correlated with the protected attribute and consider fairness constraints during training"
                .to_string(),
        );
    }

    if violations
        .iter()
        .any(|v| v.metric == "equal_opportunity_difference")
    {
        recommendations.push(
            "Equal opportunity violation: qualified members of the comparison group are approved at a different rate; recalibrate decision thresholds per group"
                .to_string(),
        );
    }

    if passes && recommendations.is_empty() {
        recommendations
            .push("Model passes fairness checks across all analyzed attributes".to_string());
    }

    recommendations
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
