//! Axum-specific error types and mappings.
//!
//! Every failure leaves the server as `{ "ok": false, "error", "status" }`
//! so the UI can treat all non-2xx answers the same way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use ytgrab_core::JobError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl HttpError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(target: "ytgrab.http", error = %self, status = status.as_u16(), "Request rejected");

        let body = ErrorBody {
            ok: false,
            error: self.to_string(),
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JobError> for HttpError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::MissingUrl => Self::BadRequest(err.to_string()),
            JobError::NotFound(_) => Self::NotFound("not found".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_errors_map_to_status_codes() {
        let missing: HttpError = JobError::MissingUrl.into();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let unknown: HttpError = JobError::NotFound("abc".into()).into();
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.to_string(), "not found");
    }

    #[test]
    fn every_variant_is_a_client_error() {
        for err in [
            HttpError::BadRequest("bad".into()),
            HttpError::NotFound("not found".into()),
            HttpError::MethodNotAllowed,
        ] {
            assert!(err.status_code().is_client_error(), "{err}");
        }
    }

    #[test]
    fn error_body_carries_status() {
        let response = HttpError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
