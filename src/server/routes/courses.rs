//! Stored course handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::core::course::{normalize, CourseDetail, CourseFormat, CourseMetadata, CourseSchema};
use crate::database::{CourseOps, CourseRecord};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

const COURSE_NOT_FOUND: &str = "Course not found";

#[derive(Debug, Deserialize)]
pub struct SaveCourseRequest {
    pub format: CourseFormat,
    pub course: Value,
    #[serde(default)]
    pub metadata: CourseMetadata,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseRecord>>> {
    state
        .db
        .list_published_courses()
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream(e, "Failed to fetch courses"))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseDetail>> {
    state
        .db
        .get_course_detail(&id)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to fetch course content"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(COURSE_NOT_FOUND))
}

/// Validate, normalize and store a generated course. Answers `201 {id}`.
pub async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<SaveCourseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let generated = CourseSchema::lenient(request.format)
        .validate(&request.course)
        .map_err(|v| ApiError::bad_request(v.to_string()))?;

    let normalized = normalize(&generated, request.metadata);
    state
        .db
        .create_course(&normalized)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to save course"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": normalized.course.id })),
    ))
}

pub async fn publish_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let updated = state
        .db
        .set_course_published(&id, request.is_published)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to update course"))?;

    if !updated {
        return Err(ApiError::not_found(COURSE_NOT_FOUND));
    }

    log::info!("Course {} is_published = {}", id, request.is_published);
    Ok(Json(serde_json::json!({ "id": id, "is_published": request.is_published })))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .db
        .delete_course(&id)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete course"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(COURSE_NOT_FOUND))
    }
}
