//! HTTP Handlers

pub mod audio;
pub mod courses;
pub mod demo;
pub mod generate;

use axum::response::IntoResponse;
use axum::Json;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "version": crate::VERSION }))
}
