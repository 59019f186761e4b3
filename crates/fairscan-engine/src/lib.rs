//! fairscan Engine
//!
//! Orchestration layer of the fairscan governance scoring engine:
//! - Five-category risk aggregation (privacy, ethical, model performance,
//!   compliance, data quality)
//! - GDPR article/strategy lookup tables and the combined compliance verdict
//! - The fast/accurate/hybrid analysis orchestrator with one-way downgrade
//!   when the deep backend is unavailable
//! - YAML analysis configuration and a structured progress-event stream

pub mod compliance;
pub mod config;
pub mod orchestrator;
pub mod progress;
pub mod risk;

pub use compliance::{
    anonymization_strategy, assess_gdpr_compliance, gdpr_article, AnonymizationStrategy,
    ComplianceVerdict, IdentifierGuidance,
};
pub use config::AnalysisConfig;
pub use orchestrator::{
    AnalysisMode, AnalysisOrchestrator, AnalysisRequest, BiasAnalysisOutput, OverallReport,
    RiskAnalysisOutput,
};
pub use progress::{ProgressEvent, ProgressLog, ProgressSink};
pub use risk::{
    AnonymizationLevel, RiskCategory, RiskCategoryAggregator, RiskCategoryReport,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compliance::{assess_gdpr_compliance, ComplianceVerdict};
    pub use crate::config::AnalysisConfig;
    pub use crate::orchestrator::{
        AnalysisMode, AnalysisOrchestrator, AnalysisRequest, OverallReport,
    };
    pub use crate::risk::{RiskCategoryAggregator, RiskCategoryReport};
}
