//! Fatigue classifier - train once, predict per assessment
//!
//! Usage:
//! ```ignore
//! let model = FatigueModel::train(&ModelConfig::default())?;
//! let assessment = model.predict(&input.features)?;
//! ```

use std::time::Instant;

use super::forest::{ForestConfig, RandomForest};
use super::preprocessing::{LabelEncoder, StandardScaler};
use super::synthetic::generate_synthetic_data;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::scoring::weighted_fatigue_score;
use crate::types::{Assessment, DriverStatus, FeatureRow};

/// Column order fed to the classifier
pub const FEATURE_NAMES: [&str; 7] = [
    "Sleep_Hours",
    "Driving_Hours",
    "Caffeine_Cups",
    "Rest_Breaks",
    "Age",
    "Stress_Level",
    "Time_of_Day_enc",
];

/// One synthetic row with its formula score and derived label
#[derive(Debug, Clone)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub score: f64,
    pub status: DriverStatus,
}

/// Summary of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub fatigued: usize,
    pub trees: usize,
    pub training_accuracy: f64,
    pub elapsed_ms: u128,
}

/// Label synthetic rows with the scoring formula
pub fn label_rows(rows: Vec<FeatureRow>, threshold: f64) -> Vec<LabeledRow> {
    rows.into_iter()
        .map(|features| {
            let score = weighted_fatigue_score(&features);
            LabeledRow {
                status: DriverStatus::from_score(score, threshold),
                score,
                features,
            }
        })
        .collect()
}

/// Encoder, scaler and forest fitted together on one synthetic set
pub struct FatigueModel {
    time_encoder: LabelEncoder,
    scaler: StandardScaler,
    forest: RandomForest,
    threshold: f64,
    report: TrainingReport,
}

impl FatigueModel {
    /// Generate synthetic data and fit the full pipeline
    pub fn train(config: &ModelConfig) -> Result<Self> {
        let started = Instant::now();
        tracing::info!(
            samples = config.samples,
            seed = config.seed,
            trees = config.n_estimators,
            "Training fatigue classifier on synthetic data"
        );

        let rows = generate_synthetic_data(config.samples, config.seed);
        let labeled = label_rows(rows, config.fatigue_threshold);
        let model = Self::fit_labeled(config, &labeled, started)?;

        tracing::info!(
            accuracy = model.report.training_accuracy,
            fatigued = model.report.fatigued,
            elapsed_ms = model.report.elapsed_ms as u64,
            "Fatigue classifier ready"
        );
        Ok(model)
    }

    fn fit_labeled(config: &ModelConfig, labeled: &[LabeledRow], started: Instant) -> Result<Self> {
        let mut time_encoder = LabelEncoder::new();
        let times: Vec<&str> = labeled.iter().map(|r| r.features.time_of_day.as_str()).collect();
        let time_codes = time_encoder.fit_transform(&times);

        let raw: Vec<Vec<f64>> = labeled
            .iter()
            .zip(&time_codes)
            .map(|(r, &code)| feature_vector(&r.features, code))
            .collect();

        let mut scaler = StandardScaler::new();
        let x = scaler.fit_transform(&raw)?;
        let y: Vec<usize> = labeled.iter().map(|r| r.status.class_index()).collect();

        let forest = RandomForest::fit(
            ForestConfig {
                n_estimators: config.n_estimators,
                max_depth: config.max_depth,
                min_samples_split: config.min_samples_split,
                seed: config.seed,
                ..Default::default()
            },
            &x,
            &y,
            DriverStatus::CLASSES.len(),
        )?;

        let mut correct = 0;
        for (row, &label) in x.iter().zip(&y) {
            if forest.predict(row)? == label {
                correct += 1;
            }
        }

        let report = TrainingReport {
            samples: labeled.len(),
            fatigued: y.iter().filter(|&&c| c == DriverStatus::Fatigued.class_index()).count(),
            trees: forest.trees().len(),
            training_accuracy: correct as f64 / labeled.len() as f64,
            elapsed_ms: started.elapsed().as_millis(),
        };

        Ok(Self {
            time_encoder,
            scaler,
            forest,
            threshold: config.fatigue_threshold,
            report,
        })
    }

    /// Classify one row and recompute its formula score
    pub fn predict(&self, features: &FeatureRow) -> Result<Assessment> {
        let code = self.time_encoder.transform(features.time_of_day.as_str())?;
        let scaled = self.scaler.transform_row(&feature_vector(features, code))?;
        let probs = self.forest.predict_proba(&scaled)?;
        let class = super::forest::argmax(&probs);

        let status = DriverStatus::from_class_index(class).unwrap_or(DriverStatus::Alert);
        let confidence = probs.iter().copied().fold(0.0, f64::max);
        let score = weighted_fatigue_score(features);

        Ok(Assessment {
            status,
            confidence,
            score,
        })
    }

    /// Accuracy against formula labels on `rows`
    pub fn accuracy(&self, rows: &[LabeledRow]) -> Result<f64> {
        if rows.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0;
        for row in rows {
            if self.predict(&row.features)?.status == row.status {
                correct += 1;
            }
        }
        Ok(correct as f64 / rows.len() as f64)
    }

    /// Hold-out accuracy on a freshly generated set with its own seed
    pub fn evaluate(&self, samples: usize, seed: u64) -> Result<f64> {
        let holdout = label_rows(generate_synthetic_data(samples, seed), self.threshold);
        self.accuracy(&holdout)
    }

    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

fn feature_vector(features: &FeatureRow, time_code: usize) -> Vec<f64> {
    vec![
        features.sleep_hours,
        features.driving_hours,
        features.caffeine_cups,
        features.rest_breaks,
        features.age as f64,
        features.stress_level,
        time_code as f64,
    ]
}
