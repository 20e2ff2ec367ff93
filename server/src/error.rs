//! API error type with `IntoResponse`.
//!
//! Errors render as the same envelope successful responses use, with a
//! status tag instead of data. Storage and configuration failures are
//! logged and masked behind a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use todo_core::ValidationError;

use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid input (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unknown todo id (404)
    #[error("Todo not found")]
    NotFound,

    /// Storage or connection failure (500, logged)
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest(message) => json!({
                "status": "bad_request",
                "message": message,
            }),
            Self::NotFound => json!({
                "status": "not_found",
                "message": self.to_string(),
            }),
            Self::Store(e) => {
                tracing::error!(error = %e, "request failed");
                json!({
                    "status": "error",
                    "message": "an internal error occurred",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}
