//! Detection backend seam
//!
//! The orchestration layer talks to detection through [`DetectionBackend`]
//! so the fast pattern path and any deeper (slower) analyzer are
//! interchangeable. [`FastBackend`] is the built-in implementation wrapping
//! the pattern scorer, the dataset aggregator, and the learned classifier.

use crate::column::ColumnRiskResult;
use crate::dataset::{DatasetRiskAggregator, DatasetRiskReport};
use crate::model::{TextCategoryClassifier, TrainedModelArtifact};
use fairscan_core::{Column, Dataset, Result};

/// A column/dataset risk analyzer usable by the orchestrator
pub trait DetectionBackend {
    /// Stable backend name recorded in reports
    fn name(&self) -> &str;

    /// Analyze a single column
    fn analyze_column(&self, column: &Column) -> Result<ColumnRiskResult>;

    /// Analyze a whole dataset
    fn analyze_dataset(&self, dataset: &Dataset) -> Result<DatasetRiskReport>;
}

/// Pattern-plus-classifier backend, always available
pub struct FastBackend {
    scorer: crate::column::ColumnRiskScorer,
    aggregator: DatasetRiskAggregator,
    classifier: TextCategoryClassifier,
}

impl FastBackend {
    /// Create a backend with an untrained classifier
    pub fn new() -> Result<Self> {
        Ok(Self {
            scorer: crate::column::ColumnRiskScorer::new()?,
            aggregator: DatasetRiskAggregator::new()?,
            classifier: TextCategoryClassifier::new(),
        })
    }

    /// Create a backend from a persisted classifier artifact
    pub fn with_artifact(artifact: TrainedModelArtifact) -> Result<Self> {
        Ok(Self {
            scorer: crate::column::ColumnRiskScorer::new()?,
            aggregator: DatasetRiskAggregator::new()?,
            classifier: TextCategoryClassifier::from_artifact(artifact)?,
        })
    }

    /// Train the embedded classifier on a labelled corpus
    pub fn train(&mut self, corpus: &[(String, String)]) -> Result<()> {
        self.classifier.train(corpus)
    }

    /// Whether the embedded classifier has been trained
    pub fn is_trained(&self) -> bool {
        self.classifier.is_trained()
    }

    /// Access the embedded classifier
    pub fn classifier(&self) -> &TextCategoryClassifier {
        &self.classifier
    }

    /// Mutable access to the embedded classifier
    pub fn classifier_mut(&mut self) -> &mut TextCategoryClassifier {
        &mut self.classifier
    }
}

impl DetectionBackend for FastBackend {
    fn name(&self) -> &str {
        "fast_pattern"
    }

    fn analyze_column(&self, column: &Column) -> Result<ColumnRiskResult> {
        self.scorer.score_column(column, &self.classifier)
    }

    fn analyze_dataset(&self, dataset: &Dataset) -> Result<DatasetRiskReport> {
        self.aggregator.aggregate(dataset, &self.classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairscan_core::Value;

    #[test]
    fn test_fast_backend_analyzes_dataset() {
        let backend = FastBackend::new().unwrap();
        let dataset = Dataset::new(
            "t",
            vec![Column::new(
                "email",
                vec![Value::from("a@b.com"), Value::from("c@d.org")],
            )],
        );

        let report = backend.analyze_dataset(&dataset).unwrap();
        assert_eq!(report.pii_columns, vec!["email"]);
        assert!(!report.model_trained);
    }

    #[test]
    fn test_train_switches_detection_method() {
        let mut backend = FastBackend::new().unwrap();
        backend
            .train(&crate::corpus::synthetic_compliance_corpus(600))
            .unwrap();
        assert!(backend.is_trained());

        let column = Column::new("email", vec![Value::from("john.doe@example.com")]);
        let result = backend.analyze_column(&column).unwrap();
        assert_eq!(result.detection_method, "pattern_classifier_hybrid");
    }
}
