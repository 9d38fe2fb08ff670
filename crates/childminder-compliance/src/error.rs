use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::coverage::CoverageError;
use crate::workflows::household::{ReviewError, RosterImportError};
use crate::workflows::vetting::ClassificationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Coverage(CoverageError),
    Vetting(ClassificationError),
    Review(ReviewError),
    Roster(RosterImportError),
    InvalidPayload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Coverage(err) => write!(f, "address history rejected: {}", err),
            AppError::Vetting(err) => write!(f, "vetting record rejected: {}", err),
            AppError::Review(err) => write!(f, "review failed: {}", err),
            AppError::Roster(err) => write!(f, "roster import failed: {}", err),
            AppError::InvalidPayload(reason) => write!(f, "invalid request: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Coverage(err) => Some(err),
            AppError::Vetting(err) => Some(err),
            AppError::Review(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::InvalidPayload(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Coverage(_)
            | AppError::Vetting(_)
            | AppError::Review(_)
            | AppError::Roster(_)
            | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CoverageError> for AppError {
    fn from(value: CoverageError) -> Self {
        Self::Coverage(value)
    }
}

impl From<ClassificationError> for AppError {
    fn from(value: ClassificationError) -> Self {
        Self::Vetting(value)
    }
}

impl From<ReviewError> for AppError {
    fn from(value: ReviewError) -> Self {
        Self::Review(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}
