//! Core types for driver assessments

use crate::error::{FatigueError, Result};
use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Time-of-day bucket the driver is on the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = FatigueError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Morning" => Ok(TimeOfDay::Morning),
            "Afternoon" => Ok(TimeOfDay::Afternoon),
            "Night" => Ok(TimeOfDay::Night),
            other => Err(FatigueError::UnknownLabel(other.to_string())),
        }
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = FatigueError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Classifier output label
///
/// Variant order matches the classifier's class indices (alphabetical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverStatus {
    Alert,
    Fatigued,
}

impl DriverStatus {
    pub const CLASSES: [DriverStatus; 2] = [DriverStatus::Alert, DriverStatus::Fatigued];

    /// Label a score against the training threshold
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            DriverStatus::Fatigued
        } else {
            DriverStatus::Alert
        }
    }

    pub fn class_index(&self) -> usize {
        match self {
            DriverStatus::Alert => 0,
            DriverStatus::Fatigued => 1,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::CLASSES.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Alert => "Alert",
            DriverStatus::Fatigued => "Fatigued",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven model features of one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "Sleep_Hours")]
    pub sleep_hours: f64,
    #[serde(rename = "Driving_Hours")]
    pub driving_hours: f64,
    #[serde(rename = "Caffeine_Cups")]
    pub caffeine_cups: f64,
    #[serde(rename = "Rest_Breaks")]
    pub rest_breaks: f64,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Stress_Level")]
    pub stress_level: f64,
    #[serde(rename = "Time_of_Day")]
    pub time_of_day: TimeOfDay,
}

/// A driver assessment as entered on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInput {
    #[serde(rename = "Name", default = "default_name")]
    pub name: String,
    #[serde(flatten)]
    pub features: FeatureRow,
}

fn default_name() -> String {
    "Driver 1".to_string()
}

impl Default for DriverInput {
    fn default() -> Self {
        Self {
            name: default_name(),
            features: FeatureRow {
                sleep_hours: 7.0,
                driving_hours: 5.0,
                caffeine_cups: 1.0,
                rest_breaks: 30.0,
                age: 35,
                stress_level: 4.0,
                time_of_day: TimeOfDay::Morning,
            },
        }
    }
}

impl DriverInput {
    /// Enforce the form bounds: non-negative quantities, stress on a 1-10 integer scale
    pub fn validate(&self) -> Result<()> {
        let f = &self.features;
        check_non_negative("Sleep_Hours", f.sleep_hours)?;
        check_non_negative("Driving_Hours", f.driving_hours)?;
        check_non_negative("Caffeine_Cups", f.caffeine_cups)?;
        check_non_negative("Rest_Breaks", f.rest_breaks)?;

        if !f.stress_level.is_finite()
            || f.stress_level.fract() != 0.0
            || !(1.0..=10.0).contains(&f.stress_level)
        {
            return Err(FatigueError::InvalidInput {
                field: "Stress_Level",
                reason: format!("expected an integer between 1 and 10, got {}", f.stress_level),
            });
        }

        if self.name.trim().is_empty() {
            return Err(FatigueError::InvalidInput {
                field: "Name",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FatigueError::InvalidInput {
            field,
            reason: format!("expected a non-negative number, got {}", value),
        });
    }
    Ok(())
}

/// Result of running one input through the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub status: DriverStatus,
    /// Probability of the winning class (0-1)
    pub confidence: f64,
    /// Formula score, recomputed independently of the classifier
    pub score: f64,
}

/// One logged assessment in the session table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "Id")]
    pub id: Uuid,
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub input: DriverInput,
    #[serde(rename = "Fatigue_Score")]
    pub fatigue_score: f64,
    #[serde(rename = "Prediction")]
    pub prediction: DriverStatus,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

impl PredictionRecord {
    /// Stamp with the current local time, to the second
    pub fn new(input: DriverInput, assessment: &Assessment) -> Self {
        let now = Local::now();
        Self::at(now.with_nanosecond(0).unwrap_or(now), input, assessment)
    }

    pub fn at(timestamp: DateTime<Local>, input: DriverInput, assessment: &Assessment) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            input,
            fatigue_score: assessment.score,
            prediction: assessment.status,
            confidence: assessment.confidence,
        }
    }

    /// Timestamp as shown in the table and the CSV export
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(timestamp_format::FORMAT).to_string()
    }
}

/// `YYYY-MM-DD HH:MM:SS` in local time
mod timestamp_format {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| de::Error::custom(format!("nonexistent local time: {}", raw)))
    }
}
