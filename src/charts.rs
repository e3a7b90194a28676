//! Chart payloads for the dashboard
//!
//! The front-end only draws; every value, colour band and series split is
//! decided here.

use crate::scoring::{RiskLevel, FATIGUE_THRESHOLD, MODERATE_THRESHOLD};
use crate::types::{DriverStatus, FeatureRow, PredictionRecord};
use serde::Serialize;
use std::collections::BTreeMap;

pub const GAUGE_MAX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeStep {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

/// Fatigue score gauge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeChart {
    pub title: &'static str,
    pub value: f64,
    pub max: f64,
    pub bar_color: &'static str,
    pub steps: Vec<GaugeStep>,
    pub threshold: f64,
    pub risk_level: &'static str,
}

pub fn gauge_chart(score: f64) -> GaugeChart {
    let level = RiskLevel::from_score(score);
    GaugeChart {
        title: "Fatigue Score",
        value: score,
        max: GAUGE_MAX,
        bar_color: level.color(),
        steps: vec![
            GaugeStep { from: 0.0, to: MODERATE_THRESHOLD, color: "#d1fae5" },
            GaugeStep { from: MODERATE_THRESHOLD, to: FATIGUE_THRESHOLD, color: "#fef3c7" },
            GaugeStep { from: FATIGUE_THRESHOLD, to: GAUGE_MAX, color: "#fee2e2" },
        ],
        threshold: FATIGUE_THRESHOLD,
        risk_level: level.label(),
    }
}

/// Five-axis snapshot of the driver, higher is better on every axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub categories: Vec<&'static str>,
    pub values: Vec<f64>,
    pub range: (f64, f64),
}

pub fn feature_radar(features: &FeatureRow) -> RadarChart {
    RadarChart {
        categories: vec![
            "Sleep Quality",
            "Driving Time",
            "Caffeine Level",
            "Rest Breaks",
            "Stress Level",
        ],
        values: vec![
            features.sleep_hours / 12.0 * 10.0,
            (16.0 - features.driving_hours) / 16.0 * 10.0,
            features.caffeine_cups / 5.0 * 10.0,
            features.rest_breaks / 120.0 * 10.0,
            (10.0 - features.stress_level) / 10.0 * 10.0,
        ],
        range: (0.0, 10.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: String,
    pub score: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSeries {
    pub status: DriverStatus,
    pub color: &'static str,
    pub points: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineChart {
    pub title: &'static str,
    pub series: Vec<TimelineSeries>,
}

/// Score over time, one series per predicted status; `None` without records
pub fn timeline_chart(records: &[PredictionRecord]) -> Option<TimelineChart> {
    if records.is_empty() {
        return None;
    }

    let mut sorted: Vec<&PredictionRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    let series = DriverStatus::CLASSES
        .iter()
        .map(|&status| TimelineSeries {
            status,
            color: status_color(status),
            points: sorted
                .iter()
                .filter(|r| r.prediction == status)
                .map(|r| TimelinePoint {
                    timestamp: r.timestamp_label(),
                    score: r.fatigue_score,
                    name: r.input.name.clone(),
                })
                .collect(),
        })
        .collect();

    Some(TimelineChart {
        title: "Fatigue Score Timeline",
        series,
    })
}

/// Prediction label counts for the distribution bar chart
pub fn status_distribution(records: &[PredictionRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.prediction.to_string()).or_insert(0) += 1;
    }
    counts
}

fn status_color(status: DriverStatus) -> &'static str {
    match status {
        DriverStatus::Alert => "#10b981",
        DriverStatus::Fatigued => "#ef4444",
    }
}
