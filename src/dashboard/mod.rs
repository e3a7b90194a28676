//! Dashboard: session record table and HTTP front-end

pub mod api;
pub mod export;

pub use api::{create_router, start_dashboard, AppState};
pub use export::{dataset_to_csv, records_to_csv, write_dataset_csv};


use crate::types::{DriverStatus, PredictionRecord};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Sidebar "Quick Stats"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub alert: usize,
    pub fatigued: usize,
    /// Mean fatigue score, absent until the first assessment
    pub avg_score: Option<f64>,
}

/// Assessments logged during this process's lifetime
pub struct SessionStore {
    records: RwLock<VecDeque<PredictionRecord>>,
    max_records: Option<usize>,
}

impl SessionStore {
    pub fn new(max_records: Option<usize>) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            max_records,
        }
    }

    pub async fn add(&self, record: PredictionRecord) {
        let mut records = self.records.write().await;
        if let Some(max) = self.max_records {
            while records.len() >= max.max(1) {
                records.pop_front();
            }
        }
        tracing::debug!(name = %record.input.name, id = %record.id, "Record added");
        records.push_back(record);
    }

    /// All records, oldest first
    pub async fn records(&self) -> Vec<PredictionRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    /// The last `limit` records, newest first
    pub async fn recent(&self, limit: usize) -> Vec<PredictionRecord> {
        let records = self.records.read().await;
        let mut recent: Vec<PredictionRecord> = records.iter().rev().take(limit).cloned().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent
    }

    pub async fn latest(&self) -> Option<PredictionRecord> {
        self.records.read().await.back().cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drop every record, returning how many were removed
    pub async fn clear(&self) -> usize {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        tracing::info!(removed, "Session records cleared");
        removed
    }

    pub async fn remove_last(&self) -> Option<PredictionRecord> {
        let removed = self.records.write().await.pop_back();
        if let Some(record) = &removed {
            tracing::info!(name = %record.input.name, "Last record removed");
        }
        removed
    }

    pub async fn stats(&self) -> SessionStats {
        let records = self.records.read().await;
        let total = records.len();
        let fatigued = records
            .iter()
            .filter(|r| r.prediction == DriverStatus::Fatigued)
            .count();
        let avg_score = if total > 0 {
            Some(records.iter().map(|r| r.fatigue_score).sum::<f64>() / total as f64)
        } else {
            None
        };

        SessionStats {
            total,
            alert: total - fatigued,
            fatigued,
            avg_score,
        }
    }

    pub async fn to_csv(&self) -> crate::error::Result<String> {
        let records = self.records.read().await;
        records_to_csv(records.iter())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}
