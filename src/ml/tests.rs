//! Integration tests for the ML pipeline

use super::*;
use crate::config::ModelConfig;
use crate::error::FatigueError;
use crate::types::{DriverStatus, FeatureRow, TimeOfDay};

fn test_config() -> ModelConfig {
    ModelConfig {
        samples: 1500,
        n_estimators: 40,
        ..Default::default()
    }
}

fn row(sleep: f64, driving: f64, caffeine: f64, rest: f64, stress: f64, tod: TimeOfDay) -> FeatureRow {
    FeatureRow {
        sleep_hours: sleep,
        driving_hours: driving,
        caffeine_cups: caffeine,
        rest_breaks: rest,
        age: 35,
        stress_level: stress,
        time_of_day: tod,
    }
}

#[test]
fn test_full_training_pipeline() {
    let model = FatigueModel::train(&test_config()).unwrap();
    let report = model.report();

    assert_eq!(report.samples, 1500);
    assert_eq!(report.trees, 40);
    assert!(report.fatigued > 0 && report.fatigued < report.samples);
    assert!(
        report.training_accuracy > 0.97,
        "training accuracy {}",
        report.training_accuracy
    );
}

#[test]
fn test_clear_cut_rows_follow_threshold() {
    let model = FatigueModel::train(&test_config()).unwrap();

    let rested = model.predict(&row(9.0, 2.0, 3.0, 60.0, 2.0, TimeOfDay::Morning)).unwrap();
    assert_eq!(rested.status, DriverStatus::Alert);
    assert_eq!(rested.score, 0.0);

    let exhausted = model.predict(&row(3.5, 14.0, 0.0, 0.0, 9.0, TimeOfDay::Night)).unwrap();
    assert_eq!(exhausted.status, DriverStatus::Fatigued);
    assert!(exhausted.score >= 5.0);
}

#[test]
fn test_reference_example_prediction() {
    let model = FatigueModel::train(&test_config()).unwrap();
    let assessment = model.predict(&row(7.0, 5.0, 1.0, 30.0, 4.0, TimeOfDay::Morning)).unwrap();

    assert!((assessment.score - 2.5).abs() < 1e-9);
    assert_eq!(assessment.status, DriverStatus::Alert);
    assert!(assessment.confidence >= 0.5 && assessment.confidence <= 1.0);
}

#[test]
fn test_holdout_accuracy() {
    let model = FatigueModel::train(&test_config()).unwrap();
    let accuracy = model.evaluate(500, 7).unwrap();
    assert!(accuracy > 0.85, "hold-out accuracy {}", accuracy);
}

#[test]
fn test_training_is_deterministic_per_seed() {
    let a = FatigueModel::train(&test_config()).unwrap();
    let b = FatigueModel::train(&test_config()).unwrap();

    for features in generate_synthetic_data(50, 99) {
        assert_eq!(a.predict(&features).unwrap(), b.predict(&features).unwrap());
    }
}

#[test]
fn test_empty_training_set() {
    let config = ModelConfig {
        samples: 0,
        ..test_config()
    };
    assert!(matches!(FatigueModel::train(&config), Err(FatigueError::EmptyDataset)));
}

#[test]
fn test_threshold_is_configurable() {
    let config = ModelConfig {
        fatigue_threshold: 100.0,
        n_estimators: 5,
        samples: 300,
        ..Default::default()
    };
    let model = FatigueModel::train(&config).unwrap();
    assert_eq!(model.report().fatigued, 0);

    let worst = model.predict(&row(3.0, 16.0, 0.0, 0.0, 10.0, TimeOfDay::Night)).unwrap();
    assert_eq!(worst.status, DriverStatus::Alert);
    assert_eq!(worst.confidence, 1.0);
}
