//! Course Generation
//!
//! # Module Structure
//!
//! - `types`: generated course shapes and metadata
//! - `schema`: per-format JSON schema and fail-fast validator
//! - `prompt`: system/user instructions for courses and scripts
//! - `generation`: structured completion calls with retry
//! - `normalizer`: generated course <-> stored records
//! - `pipeline`: end-to-end generation including audio
//! - `demo`: bundled sample courses

pub mod demo;
pub mod error;
pub mod generation;
pub mod normalizer;
pub mod pipeline;
pub mod prompt;
pub mod schema;
pub mod types;

pub use demo::demo_course;
pub use error::{GenerationError, Result, SchemaViolation};
pub use generation::{GenerationClient, GenerationConfig};
pub use normalizer::{normalize, CourseDetail, NormalizedCourse, SectionView, SlideView};
pub use pipeline::CoursePipeline;
pub use prompt::{
    CoursePrompt, PromptBundle, ScriptPrompt, AUDIO_TAGS, DEFAULT_UNIT_COUNT, MAX_SPEAKERS,
    SCRIPT_CHAR_BUDGET,
};
pub use schema::{CourseSchema, QUIZ_OPTION_COUNT};
pub use types::{
    Category, CourseFormat, CourseMetadata, Difficulty, GeneratedCourse, Quiz, Section,
    SectionCourse, Slide, SlideCourse,
};
