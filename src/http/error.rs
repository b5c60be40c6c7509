//! Error responses for the HTTP boundary.
//!
//! Every error body is JSON with at least a `message` string. Conflicts add
//! `currentData`, blocked deletes add `courseCount`, validation failures add
//! `errors`. Extractor rejections are folded into validation failures so
//! axum's plain-text bodies never reach the client.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::RegistryError;
use crate::validation::ValidationError;

/// A [`RegistryError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(RegistryError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::single("body", rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ValidationError::single("id", rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::single("query", rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.0 {
            RegistryError::ConcurrencyConflict { current } => json!({
                "message": "the record was modified by another user; review the current values and resubmit",
                "currentData": current,
            }),
            RegistryError::DependencyExists { course_count, .. } => json!({
                "message": self.0.to_string(),
                "courseCount": course_count,
            }),
            RegistryError::Validation(err) => json!({
                "message": err.to_string(),
                "errors": err.errors,
            }),
            RegistryError::Store(err) if status.is_server_error() => {
                tracing::error!(error = %err, "store failure");
                json!({ "message": "internal storage error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
