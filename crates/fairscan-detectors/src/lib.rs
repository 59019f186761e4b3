//! fairscan Detectors
//!
//! Fast-path detection for the fairscan governance scoring engine:
//! - Regex entity patterns for common PII types with per-type risk weights
//! - A TF-IDF + naive-Bayes text classifier with JSON artifact persistence
//! - Per-column risk scoring blending pattern and classifier evidence
//! - Dataset-level risk aggregation with identifier bucketing
//! - A protected-attribute keyword scanner for text-bias screening
//! - The [`DetectionBackend`] seam the orchestration layer plugs into

pub mod backend;
pub mod bias_text;
pub mod column;
pub mod corpus;
pub mod dataset;
pub mod model;
pub mod patterns;
pub mod tfidf;

pub use backend::{DetectionBackend, FastBackend};
pub use bias_text::{
    ProtectedAttributeScanner, ProtectedCategory, TextBiasColumnResult, TextBiasReport,
};
pub use column::{ColumnRiskResult, ColumnRiskScorer, DeepColumnFindings};
pub use corpus::synthetic_compliance_corpus;
pub use dataset::{DatasetRiskAggregator, DatasetRiskReport, IdentifierFinding};
pub use model::{
    BatchClassification, TextCategoryClassifier, TrainedModelArtifact, SCHEMA_VERSION,
};
pub use patterns::{entity_weight, EntityMatch, PatternDetector};
pub use tfidf::{TfidfParams, TfidfVectorizer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{DetectionBackend, FastBackend};
    pub use crate::bias_text::{ProtectedAttributeScanner, TextBiasReport};
    pub use crate::column::{ColumnRiskResult, ColumnRiskScorer};
    pub use crate::dataset::{DatasetRiskAggregator, DatasetRiskReport};
    pub use crate::model::TextCategoryClassifier;
    pub use crate::patterns::PatternDetector;
}
