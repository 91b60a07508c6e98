//! Web errors with structured JSON bodies and an HTML fallback page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use seizure_core::DashboardError;

use crate::page;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Workbook unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Workbook is not in the expected shape: {0}")]
    SourceInvalid(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            WebError::SourceUnavailable(detail) => {
                tracing::error!(detail, "workbook unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SOURCE_UNAVAILABLE",
                    "The patient workbook could not be opened".to_string(),
                )
            }
            WebError::SourceInvalid(detail) => {
                tracing::error!(detail, "workbook rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SOURCE_INVALID",
                    detail.clone(),
                )
            }
            WebError::Internal(detail) => {
                tracing::error!(detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }

    /// Render the error as a standalone HTML page for browser routes.
    pub fn into_html_response(self) -> Response {
        let (status, _, message) = self.parts();
        (status, Html(page::render_error(&message))).into_response()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DashboardError> for WebError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Io(detail) => WebError::SourceUnavailable(detail),
            other => WebError::SourceInvalid(other.to_string()),
        }
    }
}
