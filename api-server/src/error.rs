//! Mapping of handler outcomes to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::Violation;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every way a task request can fail
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected input; never reaches the store
    #[error("request validation failed")]
    Validation(Vec<Violation>),

    #[error("Task not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] task_core::Error),
}

impl ApiError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![Violation::new(field, message)])
    }
}

impl From<Violation> for ApiError {
    fn from(violation: Violation) -> Self {
        Self::Validation(vec![violation])
    }
}

impl From<Vec<Violation>> for ApiError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(violations) => {
                tracing::debug!(count = violations.len(), "Rejected invalid request");
                (StatusCode::BAD_REQUEST, Json(violations)).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: ApiError::NotFound.to_string(),
                }),
            )
                .into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Task store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
