//! Course Records
//!
//! Rows of the `courses`, `course_slides`, `course_sections` and `quizzes`
//! tables. JSON array columns are mapped through `sqlx::types::Json` so they
//! serialize as plain arrays.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::core::course::types::{CourseFormat, CourseMetadata, Quiz};

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ============================================================================
// Course Record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub course_type: String, // "slides", "video", "audio"
    pub difficulty: String,
    pub category: String,
    pub creator: String,
    pub icon: Option<String>,
    pub tags: Json<Vec<String>>,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CourseRecord {
    pub fn new(title: String, description: String, format: CourseFormat, meta: &CourseMetadata) -> Self {
        let now = now();
        Self {
            id: new_id(),
            title,
            description,
            course_type: format.as_str().to_string(),
            difficulty: meta.difficulty.as_str().to_string(),
            category: meta.category.as_str().to_string(),
            creator: meta.creator.clone(),
            icon: meta.icon.clone(),
            tags: Json(meta.tags.clone()),
            is_published: meta.is_published,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// `None` for a type string written by something other than this service
    pub fn format(&self) -> Option<CourseFormat> {
        self.course_type.parse().ok()
    }
}

// ============================================================================
// Content Unit Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SlideRecord {
    pub id: String,
    pub course_id: String,
    pub slide_number: i32,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl SlideRecord {
    pub fn new(course_id: &str, slide_number: i32, title: String, content: String) -> Self {
        Self {
            id: new_id(),
            course_id: course_id.to_string(),
            slide_number,
            title,
            content,
            created_at: now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SectionRecord {
    pub id: String,
    pub course_id: String,
    pub section_number: i32,
    pub title: String,
    pub content: String,
    pub key_points: Json<Vec<String>>,
    pub script: Option<String>,
    pub audio_url: Option<String>,
    pub duration: Option<i32>, // seconds
    pub created_at: String,
}

impl SectionRecord {
    pub fn new(course_id: &str, section_number: i32, title: String, content: String) -> Self {
        Self {
            id: new_id(),
            course_id: course_id.to_string(),
            section_number,
            title,
            content,
            key_points: Json(Vec::new()),
            script: None,
            audio_url: None,
            duration: None,
            created_at: now(),
        }
    }
}

/// Units of one course. A course holds slides or sections, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentUnits {
    Slides(Vec<SlideRecord>),
    Sections(Vec<SectionRecord>),
}

impl ContentUnits {
    pub fn len(&self) -> usize {
        match self {
            Self::Slides(s) => s.len(),
            Self::Sections(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordinals in stored order
    pub fn ordinals(&self) -> Vec<i32> {
        match self {
            Self::Slides(s) => s.iter().map(|u| u.slide_number).collect(),
            Self::Sections(s) => s.iter().map(|u| u.section_number).collect(),
        }
    }
}

// ============================================================================
// Quiz Record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuizRecord {
    pub id: String,
    pub course_id: String,
    pub slide_id: Option<String>,
    pub section_id: Option<String>,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub correct_answer: String,
    pub explanation: String,
    pub created_at: String,
}

/// The content unit a quiz belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOwner<'a> {
    Slide(&'a str),
    Section(&'a str),
}

impl QuizRecord {
    pub fn new(course_id: &str, owner: QuizOwner<'_>, quiz: &Quiz) -> Self {
        let (slide_id, section_id) = match owner {
            QuizOwner::Slide(id) => (Some(id.to_string()), None),
            QuizOwner::Section(id) => (None, Some(id.to_string())),
        };
        Self {
            id: new_id(),
            course_id: course_id.to_string(),
            slide_id,
            section_id,
            question: quiz.question.clone(),
            options: Json(quiz.options.clone()),
            correct_answer: quiz.correct_answer.clone(),
            explanation: quiz.explanation.clone(),
            created_at: now(),
        }
    }

    pub fn owner(&self) -> Option<QuizOwner<'_>> {
        match (&self.slide_id, &self.section_id) {
            (Some(id), None) => Some(QuizOwner::Slide(id)),
            (None, Some(id)) => Some(QuizOwner::Section(id)),
            _ => None,
        }
    }

    pub fn to_quiz(&self) -> Quiz {
        Quiz {
            question: self.question.clone(),
            options: self.options.0.clone(),
            correct_answer: self.correct_answer.clone(),
            explanation: self.explanation.clone(),
        }
    }
}
