//! Configuration loading
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables prefixed with `FATIGUE` (e.g. `FATIGUE__SERVER__PORT=9000`).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

/// Synthetic training set and random forest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of synthetic rows to train on
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Seed for both data generation and the forest
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    /// Maximum tree depth (unlimited when unset)
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    /// Score at or above which a synthetic row is labelled Fatigued
    #[serde(default = "default_fatigue_threshold")]
    pub fatigue_threshold: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: default_seed(),
            n_estimators: default_n_estimators(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            fatigue_threshold: default_fatigue_threshold(),
        }
    }
}

fn default_samples() -> usize {
    3000
}

fn default_seed() -> u64 {
    42
}

fn default_n_estimators() -> usize {
    300
}

fn default_min_samples_split() -> usize {
    2
}

fn default_fatigue_threshold() -> f64 {
    crate::scoring::FATIGUE_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Cap on session records; oldest entries are dropped past it
    #[serde(default)]
    pub max_records: Option<usize>,
    /// Rows shown in the "Recent Assessments" table
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Custom stylesheet served at /style.css
    #[serde(default)]
    pub style_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_records: None,
            recent_limit: default_recent_limit(),
            style_path: None,
        }
    }
}

fn default_recent_limit() -> usize {
    10
}

impl Config {
    /// Load from `path` (if it exists) and the environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix("FATIGUE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }
}
