//! API Errors
//!
//! Every failure leaves the service as `{"error": "<message>"}`. Upstream
//! detail is logged here and replaced with a route-specific message.

use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::core::course::GenerationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Log `detail` and answer 500 with `public` only.
    pub fn upstream(detail: impl Display, public: &str) -> Self {
        log::error!("{}: {}", public, detail);
        Self::Internal(public.to_string())
    }

    /// Map a generation failure. Input problems are the caller's; missing
    /// credentials are reported as such; everything else collapses into
    /// `fallback`.
    pub fn from_generation(err: GenerationError, fallback: &str) -> Self {
        match err {
            GenerationError::InvalidInput(msg) => Self::BadRequest(msg),
            GenerationError::Configuration(msg) => {
                log::error!("Generation misconfigured: {}", msg);
                Self::Internal(msg)
            }
            other => Self::upstream(other, fallback),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
