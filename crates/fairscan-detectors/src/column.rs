//! Per-column risk scoring
//!
//! Combines the pattern detector and (when trained) the learned classifier
//! into one score per column: `0.6 * regex_score + 0.4 * classifier
//! confidence`, with the regex score a weighted match sum normalized by 10
//! and capped at 1. An empty column yields a zero regex score; the risk
//! level is purely derived from the score via the quartile table.

use crate::model::TextCategoryClassifier;
use crate::patterns::{entity_weight, EntityMatch, PatternDetector};
use fairscan_core::{Column, EntityType, Result, RiskLevel, CLASSIFY_CAP, CONCAT_CAP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share of the combined score carried by the pattern detector
const PATTERN_WEIGHT: f64 = 0.6;

/// Share of the combined score carried by the learned classifier
const CLASSIFIER_WEIGHT: f64 = 0.4;

/// Risk analysis result for a single column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRiskResult {
    /// Column name
    pub column_name: String,

    /// Whether any entity pattern matched
    pub pii_detected: bool,

    /// Occurrences per detected entity type
    pub entity_counts: BTreeMap<EntityType, usize>,

    /// First matched text and occurrence count per detected entity type
    pub entity_matches: Vec<EntityMatch>,

    /// Combined risk score in [0, 1]
    pub risk_score: f64,

    /// Level derived from `risk_score` on the quartile table
    pub risk_level: RiskLevel,

    /// Majority-vote category from the learned classifier, when trained
    pub predicted_category: Option<String>,

    /// Mean top-class probability from the classifier; 0 when untrained
    pub classifier_confidence: f64,

    /// Which detection path produced this result
    pub detection_method: String,

    /// Deep-backend findings attached during hybrid merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_findings: Option<Box<DeepColumnFindings>>,
}

/// Accurate-backend sub-result attached to a flagged column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepColumnFindings {
    /// Name of the backend that produced the sub-result
    pub backend: String,

    /// The backend's own column analysis
    pub result: ColumnRiskResult,
}

/// Scores individual columns with the pattern + classifier blend
pub struct ColumnRiskScorer {
    detector: PatternDetector,
}

impl ColumnRiskScorer {
    /// Create a scorer with freshly compiled patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            detector: PatternDetector::new()?,
        })
    }

    /// Score one column
    ///
    /// The classifier contributes only when trained; an untrained classifier
    /// is not an error here, it contributes zero confidence.
    pub fn score_column(
        &self,
        column: &Column,
        classifier: &TextCategoryClassifier,
    ) -> Result<ColumnRiskResult> {
        let concat_sample = column.sample_text(CONCAT_CAP).join(" | ");
        let entity_matches = self.detector.detect_summary(&concat_sample);

        let entity_counts: BTreeMap<EntityType, usize> = entity_matches
            .iter()
            .map(|m| (m.entity_type, m.count))
            .collect();

        let weighted_sum: f64 = entity_matches
            .iter()
            .map(|m| m.count as f64 * entity_weight(m.entity_type))
            .sum();
        let regex_score = (weighted_sum / 10.0).min(1.0);

        let classify_sample = column.sample_text(CLASSIFY_CAP);
        let (predicted_category, classifier_confidence, detection_method) =
            if classifier.is_trained() && !classify_sample.is_empty() {
                let batch = classifier.classify(&classify_sample)?;
                (
                    Some(batch.predicted_category),
                    batch.confidence,
                    "pattern_classifier_hybrid",
                )
            } else {
                (None, 0.0, "pattern_only")
            };

        let risk_score = round3(
            PATTERN_WEIGHT * regex_score + CLASSIFIER_WEIGHT * classifier_confidence,
        );

        Ok(ColumnRiskResult {
            column_name: column.name.clone(),
            pii_detected: !entity_matches.is_empty(),
            entity_counts,
            entity_matches,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            predicted_category,
            classifier_confidence,
            detection_method: detection_method.to_string(),
            deep_findings: None,
        })
    }
}

/// Round a score to three decimals for stable report output
pub(crate) fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairscan_core::Value;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
    }

    #[test]
    fn test_national_id_column_scores_high() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let classifier = TextCategoryClassifier::new();

        let column = text_column(
            "ssn",
            &[
                "123-45-6789",
                "987-65-4321",
                "111-22-3333",
                "222-33-4444",
                "333-44-5555",
            ],
        );

        let result = scorer.score_column(&column, &classifier).unwrap();
        // 5 matches at weight 1.0 -> regex_score 0.5 -> combined 0.3 minimum
        assert!(result.pii_detected);
        assert!(result.risk_score >= 0.3);
        assert_eq!(result.entity_counts[&EntityType::NationalId], 5);
    }

    #[test]
    fn test_numeric_column_is_low_risk() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let classifier = TextCategoryClassifier::new();

        let column = Column::new(
            "amount",
            vec![
                Value::Float(120.5),
                Value::Float(75.0),
                Value::Float(310.2),
            ],
        );

        let result = scorer.score_column(&column, &classifier).unwrap();
        assert!(!result.pii_detected);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_column_scores_zero() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let classifier = TextCategoryClassifier::new();

        let column = Column::new("empty", vec![Value::Null, Value::Null]);
        let result = scorer.score_column(&column, &classifier).unwrap();

        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.detection_method, "pattern_only");
    }

    #[test]
    fn test_untrained_classifier_contributes_zero() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let classifier = TextCategoryClassifier::new();

        let column = text_column("email", &["a@b.com"]);
        let result = scorer.score_column(&column, &classifier).unwrap();

        assert_eq!(result.classifier_confidence, 0.0);
        assert!(result.predicted_category.is_none());
        // Single email at weight 0.7 -> 0.6 * 0.07
        assert_eq!(result.risk_score, 0.042);
    }

    #[test]
    fn test_result_surfaces_entity_match_summaries() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let classifier = TextCategoryClassifier::new();

        let column = text_column("email", &["a@b.com", "c@d.org"]);
        let result = scorer.score_column(&column, &classifier).unwrap();

        assert_eq!(result.entity_matches.len(), 1);
        let email = &result.entity_matches[0];
        assert_eq!(email.entity_type, EntityType::EmailAddress);
        assert_eq!(email.matched_text, "a@b.com");
        assert_eq!(email.count, 2);
        assert_eq!(result.entity_counts[&EntityType::EmailAddress], 2);
    }

    #[test]
    fn test_trained_classifier_sets_category() {
        let scorer = ColumnRiskScorer::new().unwrap();
        let mut classifier = TextCategoryClassifier::new();
        classifier
            .train(&crate::corpus::synthetic_compliance_corpus(600))
            .unwrap();

        let column = text_column("email", &["john.doe@example.com", "jane.smith@company.com"]);
        let result = scorer.score_column(&column, &classifier).unwrap();

        assert_eq!(result.predicted_category.as_deref(), Some("PII"));
        assert!(result.classifier_confidence > 0.0);
        assert_eq!(result.detection_method, "pattern_classifier_hybrid");
    }
}
