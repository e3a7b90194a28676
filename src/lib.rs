//! Driver Fatigue Monitoring System
//!
//! Trains a random forest on synthetic driver data at startup and serves a
//! dashboard for assessing drivers and reviewing the session's assessments.
//!
//! ## Architecture
//!
//! ```text
//! Synthetic data → Scoring (label) → Encoder/Scaler → Random Forest
//!                                                          ↓
//!                  Dashboard (axum) ← Session records ← Assessment
//!                         ↓
//!                 Charts / CSV export
//! ```

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ml;
pub mod scoring;
pub mod types;

#[cfg(test)]
mod types_tests;
