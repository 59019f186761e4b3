//! fairscan Core
//!
//! Shared types and utilities for the fairscan governance scoring engine.
//!
//! This crate provides:
//! - The dataset model (columns of heterogeneously typed values) with the
//!   bounded sampling caps used by all text-heavy operations
//! - The PII entity-type vocabulary and identifier classification sets
//! - Risk-level threshold tables (column/dataset, category, text-bias)
//! - Error types and result handling

pub mod dataset;
pub mod entity;
pub mod error;
pub mod levels;

pub use dataset::{Column, Dataset, Value, CLASSIFY_CAP, CONCAT_CAP, SAMPLE_ROWS_CAP};
pub use entity::EntityType;
pub use error::{Error, Result};
pub use levels::{CategoryLevel, RiskLevel, Severity};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dataset::{Column, Dataset, Value};
    pub use crate::entity::EntityType;
    pub use crate::error::{Error, Result};
    pub use crate::levels::{CategoryLevel, RiskLevel, Severity};
}
