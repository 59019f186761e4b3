//! Error types for fairscan

/// Result type alias using fairscan's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fairscan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Classifier invoked before training
    #[error("text classifier has not been trained")]
    NotTrained,

    /// Dataset has no rows or no columns at an aggregation boundary
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Analysis mode string not recognized
    #[error("unsupported analysis mode: {0}")]
    UnsupportedMode(String),

    /// Detector construction or execution errors
    #[error("detector error: {0}")]
    Detector(String),

    /// Deep-analysis backend errors
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors (artifact persistence, config files)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new empty-dataset error
    pub fn empty_dataset(msg: impl Into<String>) -> Self {
        Self::EmptyDataset(msg.into())
    }

    /// Create a new detector error
    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector(msg.into())
    }

    /// Create a new backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
