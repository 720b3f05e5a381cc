//! Dialogue audio streaming

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::TryStreamExt;
use serde_json::Value;

use super::generate::string_field;
use crate::core::voice::dialogue_for;
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

/// `{script}` -> streamed audio. The script is truncated and parsed before
/// the key check, so malformed input is a 400 even without a key.
pub async fn generate_audio(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Ok(Json(body)) = payload else {
        return Err(ApiError::bad_request("Script is required"));
    };
    let script = string_field(&body, "script").ok_or_else(|| ApiError::bad_request("Script is required"))?;

    let inputs = dialogue_for(script, &state.voices, state.script_limit);
    if inputs.is_empty() {
        return Err(ApiError::bad_request("No valid speaker lines found in script"));
    }

    let synthesizer = state
        .synthesizer
        .as_ref()
        .ok_or_else(|| ApiError::Internal("ElevenLabs API key not configured".to_string()))?;

    let stream = synthesizer
        .stream_dialogue(&inputs)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to generate audio"))?
        .inspect_err(|e| log::error!("Audio stream interrupted: {}", e));

    Ok((
        [
            (header::CONTENT_TYPE, synthesizer.mime_type()),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
