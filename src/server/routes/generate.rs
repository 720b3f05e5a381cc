//! Course and script generation handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::core::course::{CourseFormat, GeneratedCourse};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

const PROMPT_REQUIRED: &str = "Valid prompt is required";
const SCRIPT_FIELDS_REQUIRED: &str = "Topic and speaker count are required";
const OPENAI_NOT_CONFIGURED: &str = "OpenAI API key not configured";

fn failure_message(format: CourseFormat) -> &'static str {
    match format {
        CourseFormat::Slides => "Failed to generate course",
        CourseFormat::Video => "Failed to generate video course",
        CourseFormat::Audio => "Failed to generate audio course",
    }
}

/// Non-blank string field of a JSON body.
pub(crate) fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn generate(
    state: AppState,
    payload: Result<Json<Value>, JsonRejection>,
    format: CourseFormat,
) -> ApiResult<Json<GeneratedCourse>> {
    let Ok(Json(body)) = payload else {
        return Err(ApiError::bad_request(PROMPT_REQUIRED));
    };
    let prompt = string_field(&body, "prompt").ok_or_else(|| ApiError::bad_request(PROMPT_REQUIRED))?;

    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| ApiError::Internal(OPENAI_NOT_CONFIGURED.to_string()))?;

    log::info!("Generating {} course for prompt ({} chars)", format, prompt.chars().count());

    pipeline
        .generate(prompt, format)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_generation(e, failure_message(format)))
}

pub async fn generate_course(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<GeneratedCourse>> {
    generate(state, payload, CourseFormat::Slides).await
}

pub async fn generate_video_course(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<GeneratedCourse>> {
    generate(state, payload, CourseFormat::Video).await
}

pub async fn generate_audio_course(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<GeneratedCourse>> {
    generate(state, payload, CourseFormat::Audio).await
}

/// `{topic, speakerCount}` -> `{script}`. A speaker count of zero counts as missing.
pub async fn generate_script(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Ok(Json(body)) = payload else {
        return Err(ApiError::bad_request(SCRIPT_FIELDS_REQUIRED));
    };
    let topic = string_field(&body, "topic");
    let speakers = body
        .get("speakerCount")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

    let (Some(topic), Some(speakers)) = (topic, speakers) else {
        return Err(ApiError::bad_request(SCRIPT_FIELDS_REQUIRED));
    };

    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| ApiError::Internal(OPENAI_NOT_CONFIGURED.to_string()))?;

    let script = pipeline
        .generate_script(topic, speakers)
        .await
        .map_err(|e| ApiError::from_generation(e, "Failed to generate script"))?;

    Ok(Json(serde_json::json!({ "script": script })))
}
