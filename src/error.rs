//! Error types for the fatigue monitor

use thiserror::Error;

/// Errors surfaced by scoring, training and the dashboard
#[derive(Error, Debug)]
pub enum FatigueError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Training set is empty")]
    EmptyDataset,

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl FatigueError {
    /// Whether the error was caused by caller-supplied data
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FatigueError::InvalidInput { .. } | FatigueError::UnknownLabel(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FatigueError>;
