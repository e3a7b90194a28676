//! Weighted fatigue scoring
//!
//! Hand-written penalty formula used both to label the synthetic training
//! set and to report a score next to every prediction. The helpers map a
//! score onto the three risk bands shown on the dashboard.

use crate::types::{FeatureRow, TimeOfDay};
use serde::{Deserialize, Serialize};

/// Scores at or above this value are labelled `Fatigued`
pub const FATIGUE_THRESHOLD: f64 = 5.0;

/// Scores at or above this value are at least moderate risk
pub const MODERATE_THRESHOLD: f64 = 3.0;

/// Weighted penalty sum for one feature row
pub fn weighted_fatigue_score(row: &FeatureRow) -> f64 {
    let mut score = 0.0;
    score += (8.0 - row.sleep_hours).max(0.0) * 1.5;
    score += (row.driving_hours - 6.0).max(0.0) * 1.2;
    score += if row.caffeine_cups >= 2.0 { 0.0 } else { 1.0 };
    score += (20.0 - row.rest_breaks).max(0.0) * 0.1;
    score += if row.stress_level > 5.0 {
        (row.stress_level - 5.0) * 0.5
    } else {
        0.0
    };
    if row.time_of_day == TimeOfDay::Night {
        score += 1.0;
    }
    score
}

/// Risk band of a fatigue score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < MODERATE_THRESHOLD {
            RiskLevel::Low
        } else if score < FATIGUE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// Hex colour used by gauges and badges
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#10b981",
            RiskLevel::Moderate => "#f59e0b",
            RiskLevel::High => "#ef4444",
        }
    }

    pub fn action_message(&self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "✅ SAFE: Driver can continue driving. Maintain standard vigilance. \
                 Encourage brief breaks every 2–3 hours."
            }
            RiskLevel::Moderate => {
                "⚠️ CAUTION: Moderate risk — recommend a SHORT rest (15–30 min) and reassess. \
                 Avoid long or monotonous driving until score improves."
            }
            RiskLevel::High => {
                "🚫 DANGER: High risk — DO NOT DRIVE. Take a sustained rest (1–2 hours) \
                 or seek replacement before resuming."
            }
        }
    }
}

pub fn risk_level(score: f64) -> &'static str {
    RiskLevel::from_score(score).label()
}

pub fn risk_color(score: f64) -> &'static str {
    RiskLevel::from_score(score).color()
}

pub fn action_message(score: f64) -> &'static str {
    RiskLevel::from_score(score).action_message()
}
