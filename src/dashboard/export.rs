//! CSV export of session records and synthetic datasets

use crate::error::Result;
use crate::ml::LabeledRow;
use crate::types::{DriverStatus, PredictionRecord, TimeOfDay};
use serde::Serialize;
use std::path::Path;

pub const RECORD_COLUMNS: [&str; 12] = [
    "Timestamp",
    "Name",
    "Sleep_Hours",
    "Driving_Hours",
    "Caffeine_Cups",
    "Rest_Breaks",
    "Age",
    "Stress_Level",
    "Time_of_Day",
    "Fatigue_Score",
    "Prediction",
    "Confidence",
];

pub const DATASET_COLUMNS: [&str; 9] = [
    "Sleep_Hours",
    "Driving_Hours",
    "Caffeine_Cups",
    "Rest_Breaks",
    "Age",
    "Stress_Level",
    "Time_of_Day",
    "Fatigue_Score",
    "Driver_Status",
];

#[derive(Serialize)]
struct RecordRow<'a> {
    timestamp: String,
    name: &'a str,
    sleep_hours: f64,
    driving_hours: f64,
    caffeine_cups: f64,
    rest_breaks: f64,
    age: u32,
    stress_level: f64,
    time_of_day: TimeOfDay,
    fatigue_score: f64,
    prediction: DriverStatus,
    confidence: f64,
}

impl<'a> From<&'a PredictionRecord> for RecordRow<'a> {
    fn from(r: &'a PredictionRecord) -> Self {
        let f = &r.input.features;
        Self {
            timestamp: r.timestamp_label(),
            name: &r.input.name,
            sleep_hours: f.sleep_hours,
            driving_hours: f.driving_hours,
            caffeine_cups: f.caffeine_cups,
            rest_breaks: f.rest_breaks,
            age: f.age,
            stress_level: f.stress_level,
            time_of_day: f.time_of_day,
            fatigue_score: r.fatigue_score,
            prediction: r.prediction,
            confidence: r.confidence,
        }
    }
}

#[derive(Serialize)]
struct DatasetRow {
    sleep_hours: f64,
    driving_hours: f64,
    caffeine_cups: f64,
    rest_breaks: f64,
    age: u32,
    stress_level: f64,
    time_of_day: TimeOfDay,
    fatigue_score: f64,
    driver_status: DriverStatus,
}

impl From<&LabeledRow> for DatasetRow {
    fn from(r: &LabeledRow) -> Self {
        let f = &r.features;
        Self {
            sleep_hours: f.sleep_hours,
            driving_hours: f.driving_hours,
            caffeine_cups: f.caffeine_cups,
            rest_breaks: f.rest_breaks,
            age: f.age,
            stress_level: f.stress_level,
            time_of_day: f.time_of_day,
            fatigue_score: r.score,
            driver_status: r.status,
        }
    }
}

/// Session table as CSV; the header row is written even when empty
pub fn records_to_csv<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(RECORD_COLUMNS)?;
    for record in records {
        writer.serialize(RecordRow::from(record))?;
    }
    finish(writer)
}

pub fn dataset_to_csv(rows: &[LabeledRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(DATASET_COLUMNS)?;
    for row in rows {
        writer.serialize(DatasetRow::from(row))?;
    }
    finish(writer)
}

pub fn write_dataset_csv(path: &Path, rows: &[LabeledRow]) -> Result<()> {
    std::fs::write(path, dataset_to_csv(rows)?)?;
    tracing::info!(rows = rows.len(), path = %path.display(), "Synthetic dataset written");
    Ok(())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
