//! Bundled sample courses for front-end work without API keys.

use serde_json::Value;

use super::error::SchemaViolation;
use super::schema::CourseSchema;
use super::types::{CourseFormat, GeneratedCourse};

const SLIDES: &str = include_str!("demo/slides.json");
const VIDEO: &str = include_str!("demo/video.json");
const AUDIO: &str = include_str!("demo/audio.json");

/// Load the sample course for `format`, checked like any generated course.
pub fn demo_course(format: CourseFormat) -> Result<GeneratedCourse, SchemaViolation> {
    let raw = match format {
        CourseFormat::Slides => SLIDES,
        CourseFormat::Video => VIDEO,
        CourseFormat::Audio => AUDIO,
    };
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| SchemaViolation::root(format!("demo course is not valid JSON: {}", e)))?;
    CourseSchema::lenient(format).validate(&value)
}
