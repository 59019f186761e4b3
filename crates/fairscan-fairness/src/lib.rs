//! fairscan Fairness
//!
//! Group fairness analysis for the fairscan governance scoring engine:
//! - Per-group confusion metrics over row-aligned predictions
//! - A fairness scorer computing disparate impact, statistical parity
//!   difference, and equal opportunity difference with severity-graded
//!   violations and an overall pass verdict
//! - Descriptive demographic disparity breakdowns
//! - Binary model evaluation with a rank-based ROC-AUC

pub mod demographics;
pub mod metrics;
pub mod model_eval;
pub mod scorer;

pub use demographics::{demographic_disparity, DemographicDisparityReport, GroupDisparity};
pub use metrics::{group_metrics, EvalSet, GroupMetrics, POSITIVE_CLASS};
pub use model_eval::{evaluate_binary, ConfusionMatrix, ModelMetrics};
pub use scorer::{AttributeFairness, FairnessReport, FairnessScorer, FairnessViolation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::demographics::{demographic_disparity, DemographicDisparityReport};
    pub use crate::metrics::{EvalSet, GroupMetrics};
    pub use crate::model_eval::{evaluate_binary, ModelMetrics};
    pub use crate::scorer::{FairnessReport, FairnessScorer};
}
