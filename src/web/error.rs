use crate::report_core::ReportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{"error": message, "code": "VALIDATION" | "DATA_STORE" | "NO_DATA"}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ErrorBody {
    pub fn status(err: &ReportError) -> StatusCode {
        if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<&ReportError> for ErrorBody {
    fn from(err: &ReportError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = ErrorBody::status(&self);
        match &self {
            ReportError::DataStore(e) => log::error!("❌ Report query failed: {}", e),
            ReportError::NoData => log::debug!("Report matched no readings"),
            _ => log::debug!("Rejected report request: {}", self),
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
