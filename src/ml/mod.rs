//! Machine learning pipeline
//!
//! Provides the fatigue classifier:
//! - Synthetic training data generation
//! - Label encoding and feature standardization
//! - Random forest classification
//! - Train/predict interface used by the dashboard and CLI

pub mod forest;
pub mod predictor;
pub mod preprocessing;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use forest::{DecisionTree, ForestConfig, RandomForest};
pub use predictor::{label_rows, FatigueModel, LabeledRow, TrainingReport, FEATURE_NAMES};
pub use preprocessing::{LabelEncoder, StandardScaler};
pub use synthetic::{generate_synthetic_data, DEFAULT_SAMPLES, DEFAULT_SEED};
