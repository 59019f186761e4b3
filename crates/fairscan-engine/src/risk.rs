//! Five-category risk aggregation
//!
//! Privacy, ethical, model-performance, compliance, and data-quality risk
//! are each scored from already-computed inputs, then averaged into one
//! overall score. The aggregate uses the coarse category threshold table
//! (HIGH >= 0.7, MEDIUM >= 0.4), not the quartile table of the column
//! scorers; the two tables are intentionally distinct.

use aho_corasick::AhoCorasick;
use fairscan_core::{CategoryLevel, Dataset, Error, Result, Severity};
use fairscan_fairness::{FairnessReport, ModelMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Missing-value percentage above which a column is flagged
const MISSING_PCT_THRESHOLD: f64 = 5.0;

/// Class-imbalance ratio above which imbalance counts as severe
const SEVERE_IMBALANCE_RATIO: f64 = 5.0;

/// Each category keeps at most this many recommendations
const RECOMMENDATION_CAP: usize = 3;

/// Fixed GDPR compliance sub-score used by the privacy blend
const GDPR_COMPLIANCE_SCORE: f64 = 0.25;

/// Column flagged by name-based PII heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNamePiiFinding {
    /// Flagged column
    pub column: String,

    /// Heuristic PII kind (email, phone, ssn, ...)
    pub pii_type: String,

    /// HIGH for ssn/email/phone, MEDIUM otherwise
    pub severity: Severity,
}

/// Inferred anonymization posture of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnonymizationLevel {
    Full,
    Partial,
    None,
}

impl AnonymizationLevel {
    fn risk_contribution(&self) -> f64 {
        match self {
            AnonymizationLevel::Full => 0.0,
            AnonymizationLevel::Partial => 0.5,
            AnonymizationLevel::None => 1.0,
        }
    }
}

impl fmt::Display for AnonymizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnonymizationLevel::Full => write!(f, "FULL"),
            AnonymizationLevel::Partial => write!(f, "PARTIAL"),
            AnonymizationLevel::None => write!(f, "NONE"),
        }
    }
}

/// Privacy risk input analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyRiskAnalysis {
    /// Columns flagged by name heuristics
    pub pii_detected: Vec<ColumnNamePiiFinding>,

    /// NONE above 5 findings, PARTIAL above 0, FULL otherwise
    pub anonymization_level: AnonymizationLevel,

    /// Exposure descriptions derived from the anonymization level
    pub exposure_risks: Vec<String>,

    /// True only when no PII columns were found
    pub data_protection_by_design: bool,

    /// Fixed GDPR sub-score; structural checks need context the data lacks
    pub gdpr_compliance_score: f64,

    /// Full recommendation list before the per-category cap
    pub recommendations: Vec<String>,
}

/// Ethical risk input analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicalRiskAnalysis {
    /// Rendered fairness violations
    pub fairness_issues: Vec<String>,

    /// Caller-supplied interpretability estimate in [0, 1]
    pub transparency_score: f64,

    /// HIGH above bias score 0.5, MEDIUM above 0.3, else LOW
    pub bias_amplification: CategoryLevel,

    /// Full recommendation list before the per-category cap
    pub recommendations: Vec<String>,
}

/// Model-performance risk input analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRiskAnalysis {
    /// Detected metric shortfalls
    pub performance_gaps: Vec<String>,

    /// Mean of accuracy, precision, recall; 0.5 without supplied metrics
    pub reliability_score: f64,

    /// Full recommendation list before the per-category cap
    pub recommendations: Vec<String>,
}

/// Compliance risk input analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRiskAnalysis {
    /// Accumulated gap descriptions
    pub compliance_gaps: Vec<String>,

    /// HIGH at zero gaps, MEDIUM at one or two, LOW above
    pub audit_readiness: CategoryLevel,

    /// Full recommendation list before the per-category cap
    pub recommendations: Vec<String>,
}

/// Missing-value statistics for one flagged column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingStats {
    /// Null values in the column
    pub count: usize,

    /// Nulls as a percentage of the column length
    pub percentage: f64,
}

/// Target-column class balance statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceStats {
    /// Largest class count over smallest class count
    pub ratio: f64,

    /// True above ratio 5
    pub severe: bool,
}

/// Data-quality risk input analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityRiskAnalysis {
    /// Columns with more than 5% missing values
    pub missing_data: BTreeMap<String, MissingStats>,

    /// Class balance of the target column; `None` when the target is absent
    pub imbalance: Option<ImbalanceStats>,

    /// Combined missing/imbalance quality score in [0, 1], higher is better
    pub quality_score: f64,

    /// Full recommendation list before the per-category cap
    pub recommendations: Vec<String>,
}

/// One scored risk category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCategory {
    /// Category name
    pub name: String,

    /// Category risk score in [0, 1]
    pub score: f64,

    /// Level derived from `score` on the category table
    pub level: CategoryLevel,

    /// Headline issues, deterministic order
    pub issues: Vec<String>,

    /// At most the first 3 category recommendations
    pub recommendations: Vec<String>,
}

/// Combined five-category risk report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCategoryReport {
    /// Privacy input analysis
    pub privacy: PrivacyRiskAnalysis,

    /// Ethical input analysis
    pub ethical: EthicalRiskAnalysis,

    /// Model-performance input analysis
    pub performance: PerformanceRiskAnalysis,

    /// Compliance input analysis
    pub compliance: ComplianceRiskAnalysis,

    /// Data-quality input analysis
    pub data_quality: DataQualityRiskAnalysis,

    /// Scored categories in fixed order: privacy, ethical, model
    /// performance, compliance, data quality
    pub categories: Vec<RiskCategory>,

    /// Unweighted mean of the five category scores
    pub overall_risk_score: f64,

    /// Level derived from `overall_risk_score` on the category table
    pub risk_level: CategoryLevel,
}

struct ColumnNameScanner {
    matchers: Vec<(&'static str, Severity, AhoCorasick)>,
}

impl ColumnNameScanner {
    /// Keyword sets per PII kind, checked in fixed order with first match wins
    const SPECS: [(&'static str, Severity, &'static [&'static str]); 9] = [
        ("email", Severity::High, &["email"]),
        ("phone", Severity::High, &["phone", "mobile", "tel"]),
        (
            "address",
            Severity::Medium,
            &["address", "street", "city", "zip", "postal"],
        ),
        (
            "name",
            Severity::Medium,
            &["name", "firstname", "lastname"],
        ),
        ("ssn", Severity::High, &["ssn", "social"]),
        (
            "id",
            Severity::Medium,
            &["id", "identifier", "passport", "license"],
        ),
        ("dob", Severity::Medium, &["dob", "birth", "birthday"]),
        ("age", Severity::Medium, &["age"]),
        ("gender", Severity::Medium, &["gender"]),
    ];

    fn new() -> Result<Self> {
        let mut matchers = Vec::with_capacity(Self::SPECS.len());
        for (pii_type, severity, keywords) in Self::SPECS {
            let matcher = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords)
                .map_err(|e| {
                    Error::detector(format!(
                        "failed to build {pii_type} column-name matcher: {e}"
                    ))
                })?;
            matchers.push((pii_type, severity, matcher));
        }
        Ok(Self { matchers })
    }

    /// First matching PII kind for a column name, substring semantics
    fn classify(&self, column_name: &str) -> Option<(&'static str, Severity)> {
        self.matchers
            .iter()
            .find(|(_, _, matcher)| matcher.is_match(column_name))
            .map(|(pii_type, severity, _)| (*pii_type, *severity))
    }
}

/// Folds detector, fairness, and metric inputs into category scores
pub struct RiskCategoryAggregator {
    scanner: ColumnNameScanner,
    transparency_score: f64,
}

impl RiskCategoryAggregator {
    /// Create an aggregator with the default transparency estimate of 0.5
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: ColumnNameScanner::new()?,
            transparency_score: 0.5,
        })
    }

    /// Override the caller-supplied transparency estimate
    pub fn with_transparency(mut self, score: f64) -> Self {
        self.transparency_score = score.clamp(0.0, 1.0);
        self
    }

    /// Score all five risk categories
    ///
    /// `fairness` and `metrics` are optional inputs; without them the
    /// ethical and performance categories fall back to neutral defaults.
    pub fn analyze(
        &self,
        dataset: &Dataset,
        target_column: &str,
        fairness: Option<&FairnessReport>,
        metrics: Option<&ModelMetrics>,
    ) -> Result<RiskCategoryReport> {
        if dataset.is_empty() {
            return Err(Error::empty_dataset(format!(
                "dataset '{}' has no rows or no columns for risk aggregation",
                dataset.name
            )));
        }

        let privacy = self.analyze_privacy(dataset);
        let ethical = self.analyze_ethical(fairness);
        let performance = analyze_performance(metrics);
        let compliance = analyze_compliance(&privacy, fairness);
        let data_quality = analyze_data_quality(dataset, target_column);

        let categories = vec![
            privacy_category(&privacy),
            ethical_category(&ethical),
            performance_category(&performance),
            compliance_category(&compliance),
            data_quality_category(&data_quality),
        ];

        let overall_risk_score = round3(
            categories.iter().map(|c| c.score).sum::<f64>() / categories.len() as f64,
        );
        let risk_level = CategoryLevel::from_category_score(overall_risk_score);

        info!(
            dataset = %dataset.name,
            overall_risk_score,
            %risk_level,
            "aggregated risk categories"
        );

        Ok(RiskCategoryReport {
            privacy,
            ethical,
            performance,
            compliance,
            data_quality,
            categories,
            overall_risk_score,
            risk_level,
        })
    }

    fn analyze_privacy(&self, dataset: &Dataset) -> PrivacyRiskAnalysis {
        let mut pii_detected = Vec::new();
        for name in dataset.column_names() {
            if let Some((pii_type, severity)) = self.scanner.classify(&name.to_lowercase()) {
                pii_detected.push(ColumnNamePiiFinding {
                    column: name.to_string(),
                    pii_type: pii_type.to_string(),
                    severity,
                });
            }
        }

        let mut exposure_risks = Vec::new();
        let anonymization_level = if pii_detected.len() > 5 {
            exposure_risks
                .push("High number of PII columns detected without anonymization".to_string());
            AnonymizationLevel::None
        } else if !pii_detected.is_empty() {
            exposure_risks
                .push("Some PII columns detected - consider anonymization".to_string());
            AnonymizationLevel::Partial
        } else {
            AnonymizationLevel::Full
        };

        let mut recommendations = Vec::new();
        if !pii_detected.is_empty() {
            recommendations.push(
                "Implement data anonymization techniques (hashing, tokenization)".to_string(),
            );
            recommendations.push("Remove unnecessary PII columns".to_string());
            recommendations.push("Implement access controls for sensitive data".to_string());
        }
        recommendations.push("Implement data encryption at rest and in transit".to_string());
        recommendations.push("Establish data retention and deletion policies".to_string());
        recommendations.push("Conduct regular privacy impact assessments".to_string());

        PrivacyRiskAnalysis {
            data_protection_by_design: pii_detected.is_empty(),
            pii_detected,
            anonymization_level,
            exposure_risks,
            gdpr_compliance_score: GDPR_COMPLIANCE_SCORE,
            recommendations,
        }
    }

    fn analyze_ethical(&self, fairness: Option<&FairnessReport>) -> EthicalRiskAnalysis {
        let fairness_issues: Vec<String> = fairness
            .map(|report| {
                report
                    .violations
                    .iter()
                    .map(|v| {
                        format!(
                            "{}: {} (Severity: {})",
                            v.attribute, v.description, v.severity
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let overall_bias = fairness.map(|report| report.bias_score).unwrap_or(0.0);
        let bias_amplification = if overall_bias > 0.5 {
            CategoryLevel::High
        } else if overall_bias > 0.3 {
            CategoryLevel::Medium
        } else {
            CategoryLevel::Low
        };

        EthicalRiskAnalysis {
            fairness_issues,
            transparency_score: self.transparency_score,
            bias_amplification,
            recommendations: vec![
                "Implement regular fairness audits and monitoring".to_string(),
                "Use explainable AI techniques (SHAP, LIME) for transparency".to_string(),
                "Establish ethics review board for model deployment".to_string(),
                "Create feedback mechanisms for affected individuals".to_string(),
                "Document decision-making processes and limitations".to_string(),
            ],
        }
    }
}

fn analyze_performance(metrics: Option<&ModelMetrics>) -> PerformanceRiskAnalysis {
    let Some(metrics) = metrics else {
        return PerformanceRiskAnalysis {
            performance_gaps: Vec::new(),
            reliability_score: 0.5,
            recommendations: vec![
                "Implement continuous monitoring of model performance".to_string(),
                "Set up alerts for performance degradation".to_string(),
            ],
        };
    };

    let mut performance_gaps = Vec::new();
    let mut recommendations = Vec::new();

    if metrics.accuracy < 0.7 {
        performance_gaps.push("Low overall accuracy - model may not be reliable".to_string());
        recommendations.push("Consider more complex models or feature engineering".to_string());
        recommendations.push("Collect more training data".to_string());
    }
    if metrics.precision < 0.6 {
        performance_gaps.push("Low precision - high false positive rate".to_string());
    }
    if metrics.recall < 0.6 {
        performance_gaps.push("Low recall - missing many positive cases".to_string());
    }
    if metrics.precision < 0.6 || metrics.recall < 0.6 {
        recommendations.push("Adjust classification threshold".to_string());
        recommendations.push("Address class imbalance".to_string());
    }
    recommendations.push("Implement continuous monitoring of model performance".to_string());
    recommendations.push("Set up alerts for performance degradation".to_string());

    PerformanceRiskAnalysis {
        performance_gaps,
        reliability_score: (metrics.accuracy + metrics.precision + metrics.recall) / 3.0,
        recommendations,
    }
}

fn analyze_compliance(
    privacy: &PrivacyRiskAnalysis,
    fairness: Option<&FairnessReport>,
) -> ComplianceRiskAnalysis {
    let mut compliance_gaps = Vec::new();

    if !privacy.pii_detected.is_empty() {
        compliance_gaps.push("Unprotected PII may violate GDPR/CCPA requirements".to_string());
    }
    if fairness.is_some_and(|report| !report.violations.is_empty()) {
        compliance_gaps
            .push("Fairness violations may violate anti-discrimination laws".to_string());
    }
    if !privacy.data_protection_by_design {
        compliance_gaps.push("Lack of privacy by design principles".to_string());
    }

    let audit_readiness = match compliance_gaps.len() {
        0 => CategoryLevel::High,
        1 | 2 => CategoryLevel::Medium,
        _ => CategoryLevel::Low,
    };

    ComplianceRiskAnalysis {
        compliance_gaps,
        audit_readiness,
        recommendations: vec![
            "Conduct comprehensive privacy impact assessment".to_string(),
            "Document data lineage and processing activities".to_string(),
            "Implement data subject rights (access, deletion, portability)".to_string(),
            "Establish regular compliance audits".to_string(),
            "Create model cards documenting intended use and limitations".to_string(),
        ],
    }
}

fn analyze_data_quality(dataset: &Dataset, target_column: &str) -> DataQualityRiskAnalysis {
    let mut missing_data = BTreeMap::new();
    for column in &dataset.columns {
        if column.is_empty() {
            continue;
        }
        let count = column.null_count();
        let percentage = count as f64 / column.len() as f64 * 100.0;
        if percentage > MISSING_PCT_THRESHOLD {
            missing_data.insert(column.name.clone(), MissingStats { count, percentage });
        }
    }

    let imbalance = dataset.column(target_column).map(|target| {
        let mut class_counts: BTreeMap<String, usize> = BTreeMap::new();
        for value in &target.values {
            if !matches!(value, fairscan_core::Value::Null) {
                *class_counts.entry(value.render()).or_insert(0) += 1;
            }
        }
        let ratio = if class_counts.len() > 1 {
            let max = class_counts.values().max().copied().unwrap_or(1) as f64;
            let min = class_counts.values().min().copied().unwrap_or(1) as f64;
            max / min
        } else {
            1.0
        };
        ImbalanceStats {
            ratio,
            severe: ratio > SEVERE_IMBALANCE_RATIO,
        }
    });

    let missing_score = 1.0 - missing_data.len() as f64 / dataset.column_count() as f64;
    let ratio = imbalance.as_ref().map(|i| i.ratio).unwrap_or(1.0);
    let imbalance_score = 1.0 / (1.0 + (ratio - 1.0).ln_1p());
    let quality_score = (missing_score + imbalance_score) / 2.0;

    let mut recommendations = Vec::new();
    if !missing_data.is_empty() {
        recommendations.push("Address missing data through imputation or removal".to_string());
    }
    if imbalance.as_ref().is_some_and(|i| i.severe) {
        recommendations
            .push("Use resampling techniques (SMOTE) to address class imbalance".to_string());
        recommendations.push("Consider adjusting class weights in model training".to_string());
    }
    recommendations.push("Implement data validation pipelines".to_string());
    recommendations.push("Monitor data drift over time".to_string());

    DataQualityRiskAnalysis {
        missing_data,
        imbalance,
        quality_score,
        recommendations,
    }
}

fn privacy_category(privacy: &PrivacyRiskAnalysis) -> RiskCategory {
    let pii_score = (privacy.pii_detected.len() as f64 / 10.0).min(1.0);
    let anon_score = privacy.anonymization_level.risk_contribution();
    let gdpr_score = 1.0 - privacy.gdpr_compliance_score;
    let score = round3(pii_score * 0.4 + anon_score * 0.3 + gdpr_score * 0.3);

    RiskCategory {
        name: "privacy".to_string(),
        score,
        level: CategoryLevel::from_category_score(score),
        issues: vec![
            format!("{} PII columns detected", privacy.pii_detected.len()),
            format!("Anonymization level: {}", privacy.anonymization_level),
        ],
        recommendations: capped(&privacy.recommendations),
    }
}

fn ethical_category(ethical: &EthicalRiskAnalysis) -> RiskCategory {
    let fairness_score = ethical.fairness_issues.len() as f64 / 10.0;
    let transparency_risk = 1.0 - ethical.transparency_score;
    let amp_score = match ethical.bias_amplification {
        CategoryLevel::Low => 0.2,
        CategoryLevel::Medium => 0.5,
        CategoryLevel::High => 0.9,
    };
    let score = round3(
        (fairness_score * 0.4 + transparency_risk * 0.3 + amp_score * 0.3).min(1.0),
    );

    RiskCategory {
        name: "ethical".to_string(),
        score,
        level: CategoryLevel::from_category_score(score),
        issues: ethical.fairness_issues.iter().take(3).cloned().collect(),
        recommendations: capped(&ethical.recommendations),
    }
}

fn performance_category(performance: &PerformanceRiskAnalysis) -> RiskCategory {
    let score = round3(1.0 - performance.reliability_score);

    RiskCategory {
        name: "model_performance".to_string(),
        score,
        level: CategoryLevel::from_category_score(score),
        issues: performance.performance_gaps.clone(),
        recommendations: capped(&performance.recommendations),
    }
}

fn compliance_category(compliance: &ComplianceRiskAnalysis) -> RiskCategory {
    let score = round3((compliance.compliance_gaps.len() as f64 / 10.0).min(1.0));

    RiskCategory {
        name: "compliance".to_string(),
        score,
        level: CategoryLevel::from_category_score(score),
        issues: compliance.compliance_gaps.clone(),
        recommendations: capped(&compliance.recommendations),
    }
}

fn data_quality_category(data_quality: &DataQualityRiskAnalysis) -> RiskCategory {
    let score = round3(1.0 - data_quality.quality_score);
    let ratio = data_quality
        .imbalance
        .as_ref()
        .map(|i| i.ratio)
        .unwrap_or(1.0);

    RiskCategory {
        name: "data_quality".to_string(),
        score,
        level: CategoryLevel::from_category_score(score),
        issues: vec![
            format!("{} columns with missing data", data_quality.missing_data.len()),
            format!("Class imbalance ratio: {ratio:.2}"),
        ],
        recommendations: capped(&data_quality.recommendations),
    }
}

fn capped(recommendations: &[String]) -> Vec<String> {
    recommendations
        .iter()
        .take(RECOMMENDATION_CAP)
        .cloned()
        .collect()
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairscan_core::{Column, Value};

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
    }

    fn clean_dataset() -> Dataset {
        Dataset::new(
            "t",
            vec![
                text_column("feature_a", &["x", "y", "x", "y"]),
                text_column("approved", &["1", "0", "1", "0"]),
            ],
        )
    }

    #[test]
    fn test_empty_dataset_fails() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let err = aggregator
            .analyze(&Dataset::new("empty", vec![]), "y", None, None)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
    }

    #[test]
    fn test_column_name_heuristics() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let dataset = Dataset::new(
            "t",
            vec![
                text_column("customer_email", &["x"]),
                text_column("ssn", &["x"]),
                text_column("birth_date", &["x"]),
                text_column("amount", &["x"]),
            ],
        );

        let report = aggregator.analyze(&dataset, "amount", None, None).unwrap();
        let privacy = &report.privacy;

        assert_eq!(privacy.pii_detected.len(), 3);
        assert_eq!(privacy.pii_detected[0].pii_type, "email");
        assert_eq!(privacy.pii_detected[0].severity, Severity::High);
        assert_eq!(privacy.pii_detected[1].pii_type, "ssn");
        assert_eq!(privacy.pii_detected[2].pii_type, "dob");
        assert_eq!(privacy.pii_detected[2].severity, Severity::Medium);
        assert_eq!(privacy.anonymization_level, AnonymizationLevel::Partial);
        assert!(!privacy.data_protection_by_design);
    }

    #[test]
    fn test_anonymization_level_none_above_five_findings() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let dataset = Dataset::new(
            "t",
            vec![
                text_column("email", &["x"]),
                text_column("phone", &["x"]),
                text_column("address", &["x"]),
                text_column("name", &["x"]),
                text_column("ssn", &["x"]),
                text_column("passport", &["x"]),
            ],
        );

        let report = aggregator.analyze(&dataset, "y", None, None).unwrap();
        assert_eq!(
            report.privacy.anonymization_level,
            AnonymizationLevel::None
        );
    }

    #[test]
    fn test_clean_dataset_privacy_score() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let report = aggregator
            .analyze(&clean_dataset(), "approved", None, None)
            .unwrap();

        // 0 PII, FULL anonymization: 0.4*0 + 0.3*0 + 0.3*0.75
        assert_eq!(report.categories[0].name, "privacy");
        assert_eq!(report.categories[0].score, 0.225);
        assert_eq!(report.categories[0].level, CategoryLevel::Low);
    }

    #[test]
    fn test_performance_category_from_metrics() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let metrics = ModelMetrics {
            accuracy: 0.6,
            precision: 0.5,
            recall: 0.4,
            f1_score: 0.44,
            roc_auc: None,
            confusion: fairscan_fairness::ConfusionMatrix {
                true_positives: 2,
                false_positives: 2,
                true_negatives: 2,
                false_negatives: 3,
            },
        };

        let report = aggregator
            .analyze(&clean_dataset(), "approved", None, Some(&metrics))
            .unwrap();

        let performance = &report.performance;
        assert_eq!(performance.performance_gaps.len(), 3);
        assert!((performance.reliability_score - 0.5).abs() < 1e-9);
        assert_eq!(report.categories[2].score, 0.5);
        assert_eq!(report.categories[2].level, CategoryLevel::Medium);
    }

    #[test]
    fn test_missing_data_flags_columns_above_threshold() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let dataset = Dataset::new(
            "t",
            vec![
                Column::new(
                    "sparse",
                    vec![Value::Null, Value::from("x"), Value::Null, Value::from("y")],
                ),
                text_column("dense", &["a", "b", "c", "d"]),
            ],
        );

        let report = aggregator.analyze(&dataset, "dense", None, None).unwrap();
        let quality = &report.data_quality;

        assert_eq!(quality.missing_data.len(), 1);
        assert_eq!(quality.missing_data["sparse"].count, 2);
        assert_eq!(quality.missing_data["sparse"].percentage, 50.0);
    }

    #[test]
    fn test_imbalance_score_decreases_with_ratio() {
        let balanced = analyze_data_quality(&clean_dataset(), "approved");
        assert_eq!(balanced.imbalance.as_ref().unwrap().ratio, 1.0);

        let skewed = Dataset::new(
            "t",
            vec![text_column(
                "label",
                &["1", "1", "1", "1", "1", "1", "1", "1", "1", "0"],
            )],
        );
        let skewed_quality = analyze_data_quality(&skewed, "label");
        let stats = skewed_quality.imbalance.as_ref().unwrap();
        assert_eq!(stats.ratio, 9.0);
        assert!(stats.severe);
        assert!(skewed_quality.quality_score < balanced.quality_score);
    }

    #[test]
    fn test_missing_target_defaults_imbalance() {
        let quality = analyze_data_quality(&clean_dataset(), "not_a_column");
        assert!(quality.imbalance.is_none());
        // absent target contributes a neutral imbalance score of 1.0
        assert_eq!(quality.quality_score, 1.0);
    }

    #[test]
    fn test_overall_is_mean_of_categories() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let report = aggregator
            .analyze(&clean_dataset(), "approved", None, None)
            .unwrap();

        let mean =
            report.categories.iter().map(|c| c.score).sum::<f64>() / 5.0;
        assert!((report.overall_risk_score - round3(mean)).abs() < 1e-9);
        assert!(report.overall_risk_score >= 0.0 && report.overall_risk_score <= 1.0);
    }

    #[test]
    fn test_recommendations_are_capped_at_three() {
        let aggregator = RiskCategoryAggregator::new().unwrap();
        let dataset = Dataset::new(
            "t",
            vec![text_column("email", &["x"]), text_column("y", &["1", "0"])],
        );

        let report = aggregator.analyze(&dataset, "y", None, None).unwrap();
        for category in &report.categories {
            assert!(category.recommendations.len() <= 3);
        }
    }
}
