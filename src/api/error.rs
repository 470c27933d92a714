//! API error mapping.
//!
//! # Design Decisions
//! - Diagnostic failure is not request failure: "unhealthy" and "not matched"
//!   reports ship as HTTP 200; only malformed requests and missing
//!   collaborators become HTTP errors
//! - Malformed JSON maps to 400 (axum's default 422 for data errors is
//!   folded in via the rejection conversion)
//! - Every error body is structured JSON: `{"error": "..."}`

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::cluster::ClusterError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid request fields, including unparsable JSON.
    #[error("{0}")]
    Validation(String),

    /// A named object the request points at does not exist.
    #[error("{0}")]
    NotFound(String),

    /// No cluster accessor is configured, or the cluster cannot be reached.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn no_cluster() -> Self {
        ApiError::Unavailable("no cluster context configured".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "API request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<ClusterError> for ApiError {
    fn from(err: ClusterError) -> Self {
        match err {
            ClusterError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ClusterError::Unavailable(_) => ApiError::Unavailable(err.to_string()),
        }
    }
}
