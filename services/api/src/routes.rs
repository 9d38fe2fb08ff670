use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use childminder_compliance::error::AppError;
use childminder_compliance::workflows::calendar::deserialize_optional_day;
use childminder_compliance::workflows::coverage::{
    validate_history_submission, CoverageResult, ResidencePeriod, TimelineCoverageEngine,
};
use childminder_compliance::workflows::household::{
    attach_addresses, evaluate_roster, parse_addresses, parse_roster, review_person,
    ComplianceDashboard, PersonFile, PersonReview,
};
use childminder_compliance::workflows::vetting::{
    ComplianceClassifier, ComplianceVerdict, VettingRecord,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct CoverageRequest {
    pub(crate) periods: Vec<ResidencePeriod>,
    #[serde(default)]
    pub(crate) window_years: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub(crate) as_of: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CoverageResponse {
    pub(crate) as_of: NaiveDate,
    pub(crate) window_years: u32,
    #[serde(flatten)]
    pub(crate) coverage: CoverageResult,
    pub(crate) submission_accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) submission_blocker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) record: VettingRecord,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub(crate) now: Option<NaiveDate>,
    /// Fill a missing expiry from the issue date before classifying.
    #[serde(default)]
    pub(crate) suggest_expiry: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) person: PersonFile,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub(crate) now: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardRequest {
    pub(crate) roster_csv: String,
    #[serde(default)]
    pub(crate) addresses_csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub(crate) now: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) horizon_days: Option<u32>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/coverage", post(coverage_endpoint))
        .route("/api/v1/vetting/classify", post(classify_endpoint))
        .route("/api/v1/household/review", post(review_endpoint))
        .route("/api/v1/household/dashboard", post(dashboard_endpoint))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn accept<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn coverage_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CoverageRequest>, JsonRejection>,
) -> Result<Json<CoverageResponse>, AppError> {
    let CoverageRequest {
        periods,
        window_years,
        as_of,
        explanation,
    } = accept(payload)?;

    let engine = TimelineCoverageEngine::new(state.settings.coverage.clone());
    let window_years = window_years.unwrap_or(engine.config().window_years);
    let as_of = as_of.unwrap_or_else(today);
    let coverage = engine.compute(&periods, window_years, as_of)?;

    let submission_blocker = validate_history_submission(&coverage, explanation.as_deref())
        .err()
        .map(|err| err.to_string());

    Ok(Json(CoverageResponse {
        as_of,
        window_years,
        coverage,
        submission_accepted: submission_blocker.is_none(),
        submission_blocker,
    }))
}

pub(crate) async fn classify_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ComplianceVerdict>, AppError> {
    let payload = accept(payload)?;
    let classifier = ComplianceClassifier::new(state.settings.policy.clone());
    let record = if payload.suggest_expiry {
        payload.record.with_suggested_expiry(classifier.policy())
    } else {
        payload.record
    };

    let verdict = classifier.classify(&record, payload.now.unwrap_or_else(today))?;
    Ok(Json(verdict))
}

pub(crate) async fn review_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<PersonReview>, AppError> {
    let payload = accept(payload)?;
    let now = payload.now.unwrap_or_else(today);
    let review = review_person(&payload.person, now, &state.settings)?;
    Ok(Json(review))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DashboardRequest>, JsonRejection>,
) -> Result<Json<ComplianceDashboard>, AppError> {
    let DashboardRequest {
        roster_csv,
        addresses_csv,
        now,
        horizon_days,
    } = accept(payload)?;

    let mut people = parse_roster(Cursor::new(roster_csv.into_bytes()))?;
    if let Some(csv) = addresses_csv {
        let addresses = parse_addresses(Cursor::new(csv.into_bytes()))?;
        attach_addresses(&mut people, addresses);
    }

    let now = now.unwrap_or_else(today);
    let report = evaluate_roster(&people, now, &state.settings);
    let dashboard = report.summary(horizon_days.unwrap_or(state.settings.horizon_days));

    info!(
        people = dashboard.total_people,
        attention = dashboard.attention.len(),
        rejected = dashboard.rejected.len(),
        %now,
        "household dashboard built"
    );

    Ok(Json(dashboard))
}
