//! Dashboard HTTP API
//!
//! One endpoint group per page of the dashboard (Dashboard, Add Driver,
//! Analytics, Records, About) plus the embedded front page.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{SessionStats, SessionStore};
use crate::charts::{self, GaugeChart, RadarChart, TimelineChart};
use crate::config::DashboardConfig;
use crate::error::FatigueError;
use crate::ml::FatigueModel;
use crate::scoring::RiskLevel;
use crate::types::{DriverInput, DriverStatus, PredictionRecord};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const DEFAULT_CSS: &str = include_str!("../../static/style.css");

/// State shared across handlers
pub struct AppState {
    pub model: Arc<FatigueModel>,
    pub session: SessionStore,
    pub config: DashboardConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(model: Arc<FatigueModel>, config: DashboardConfig) -> Self {
        Self {
            model,
            session: SessionStore::new(config.max_records),
            config,
            started_at: Utc::now(),
        }
    }
}

/// Error body returned by every endpoint
struct ApiError(FatigueError);

impl From<FatigueError> for ApiError {
    fn from(err: FatigueError) -> Self {
        Self(err)
    }
}

/// Malformed bodies and unknown labels answer with the same JSON error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(FatigueError::InvalidInput {
            field: "body",
            reason: rejection.body_text(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Banner style for an action message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl From<RiskLevel> for Severity {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Severity::Success,
            RiskLevel::Moderate => Severity::Warning,
            RiskLevel::High => Severity::Error,
        }
    }
}

/// Score, charts and advice for a single assessment
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub name: String,
    pub status: DriverStatus,
    pub confidence_pct: f64,
    pub fatigue_score: f64,
    pub risk_level: &'static str,
    pub action_message: &'static str,
    pub severity: Severity,
    pub gauge: GaugeChart,
    pub radar: RadarChart,
}

impl AssessmentSummary {
    fn from_record(record: &PredictionRecord) -> Self {
        let level = RiskLevel::from_score(record.fatigue_score);
        Self {
            name: record.input.name.clone(),
            status: record.prediction,
            confidence_pct: record.confidence * 100.0,
            fatigue_score: record.fatigue_score,
            risk_level: level.label(),
            action_message: level.action_message(),
            severity: level.into(),
            gauge: charts::gauge_chart(record.fatigue_score),
            radar: charts::feature_radar(&record.input.features),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub message: String,
    pub record: PredictionRecord,
    pub summary: AssessmentSummary,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub message: Option<&'static str>,
    pub recent: Vec<PredictionRecord>,
    pub timeline: Option<TimelineChart>,
    pub latest: Option<AssessmentSummary>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsView {
    pub message: Option<&'static str>,
    pub distribution: BTreeMap<String, usize>,
    pub timeline: Option<TimelineChart>,
}

#[derive(Debug, Serialize)]
pub struct AboutInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub highlights: Vec<&'static str>,
    pub note: &'static str,
    pub training_samples: usize,
    pub trees: usize,
    pub training_accuracy: f64,
    pub fatigue_threshold: f64,
    pub uptime_secs: i64,
}

// ============ HTTP API Handlers ============

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Custom stylesheet if configured and readable, built-in otherwise
async fn stylesheet(State(state): State<Arc<AppState>>) -> Response {
    let css = match &state.config.style_path {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("Failed to read stylesheet {}: {}", path.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => DEFAULT_CSS.to_string(),
    };
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response()
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<SessionStats> {
    Json(state.session.stats().await)
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let records = state.session.records().await;
    if records.is_empty() {
        return Json(DashboardView {
            message: Some("No assessments yet. Add a driver from the sidebar."),
            recent: Vec::new(),
            timeline: None,
            latest: None,
        });
    }

    Json(DashboardView {
        message: None,
        recent: state.session.recent(state.config.recent_limit).await,
        timeline: charts::timeline_chart(&records),
        latest: records.last().map(AssessmentSummary::from_record),
    })
}

async fn get_form_defaults() -> Json<DriverInput> {
    Json(DriverInput::default())
}

async fn assess_driver(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DriverInput>, JsonRejection>,
) -> Result<Json<AssessResponse>, ApiError> {
    let Json(input) = payload?;
    input.validate()?;
    let assessment = state.model.predict(&input.features)?;
    let record = PredictionRecord::new(input, &assessment);

    tracing::info!(
        name = %record.input.name,
        score = record.fatigue_score,
        status = %record.prediction,
        confidence = record.confidence,
        "Driver assessed"
    );

    let message = format!(
        "{} is predicted as **{}** ({:.1}% confidence)",
        record.input.name,
        record.prediction,
        record.confidence * 100.0
    );
    let summary = AssessmentSummary::from_record(&record);
    state.session.add(record.clone()).await;

    Ok(Json(AssessResponse {
        message,
        record,
        summary,
    }))
}

async fn get_analytics(State(state): State<Arc<AppState>>) -> Json<AnalyticsView> {
    let records = state.session.records().await;
    Json(AnalyticsView {
        message: records.is_empty().then_some("No data available yet."),
        distribution: charts::status_distribution(&records),
        timeline: charts::timeline_chart(&records),
    })
}

async fn get_records(State(state): State<Arc<AppState>>) -> Json<Vec<PredictionRecord>> {
    Json(state.session.records().await)
}

async fn download_csv(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let csv = state.session.to_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"driver_records.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn clear_records(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.clear().await;
    StatusCode::NO_CONTENT
}

async fn remove_last_record(State(state): State<Arc<AppState>>) -> Response {
    match state.session.remove_last().await {
        Some(record) => Json(record).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_about(State(state): State<Arc<AppState>>) -> Json<AboutInfo> {
    let report = state.model.report();
    Json(AboutInfo {
        title: "Driver Fatigue Monitoring System",
        description: "A demo ML-powered dashboard for assessing driver fatigue levels using behavioral data.",
        highlights: vec![
            "Built with Rust, axum and a hand-rolled random forest",
            "Random Forest classifier trained on synthetic data",
            "Interactive analytics with real-time visual feedback",
        ],
        note: "This app is a prototype, not a certified safety device.",
        training_samples: report.samples,
        trees: report.trees,
        training_accuracy: report.training_accuracy,
        fatigue_threshold: state.model.threshold(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// Create dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/style.css", get(stylesheet))
        .route("/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/assess/defaults", get(get_form_defaults))
        .route("/api/assess", post(assess_driver))
        .route("/api/analytics", get(get_analytics))
        .route("/api/records", get(get_records).delete(clear_records))
        .route("/api/records/last", delete(remove_last_record))
        .route("/api/records.csv", get(download_csv))
        .route("/api/about", get(get_about))
        .with_state(state)
}

/// Start dashboard server
pub async fn start_dashboard(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Dashboard server starting on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
