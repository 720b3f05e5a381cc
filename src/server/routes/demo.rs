//! Sample courses that need no API keys

use axum::Json;

use crate::core::course::{demo_course, CourseFormat, GeneratedCourse};
use crate::server::error::{ApiError, ApiResult};

fn serve(format: CourseFormat) -> ApiResult<Json<GeneratedCourse>> {
    demo_course(format)
        .map(Json)
        .map_err(|e| ApiError::upstream(e, "Failed to load demo course"))
}

pub async fn mock_course() -> ApiResult<Json<GeneratedCourse>> {
    serve(CourseFormat::Slides)
}

pub async fn mock_video_course() -> ApiResult<Json<GeneratedCourse>> {
    serve(CourseFormat::Video)
}

pub async fn mock_audio_course() -> ApiResult<Json<GeneratedCourse>> {
    serve(CourseFormat::Audio)
}
