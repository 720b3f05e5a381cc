//! Course Domain Types
//!
//! Generated course shapes (as produced by the completion service) plus the
//! descriptive metadata attached when a course is saved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Format
// ============================================================================

/// Presentation format of a course. Fixes the shape of its content units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseFormat {
    Slides,
    Video,
    Audio,
}

impl CourseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// JSON key holding the unit array (`slides` or `sections`)
    pub fn units_key(&self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Video | Self::Audio => "sections",
        }
    }

    /// JSON key holding the declared unit count
    pub fn total_key(&self) -> &'static str {
        match self {
            Self::Slides => "total_slides",
            Self::Video | Self::Audio => "total_sections",
        }
    }

    /// JSON key holding a unit's ordinal
    pub fn ordinal_key(&self) -> &'static str {
        match self {
            Self::Slides => "slide_number",
            Self::Video | Self::Audio => "section_number",
        }
    }

    pub fn uses_sections(&self) -> bool {
        !matches!(self, Self::Slides)
    }
}

impl fmt::Display for CourseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slides" => Ok(Self::Slides),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            other => Err(format!("unknown course format: {}", other)),
        }
    }
}

// ============================================================================
// Generated Shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub slide_number: u32,
    pub title: String,
    pub content: String,
    pub quiz: Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_number: u32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Dialogue script (audio courses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// `None` when synthesis was never attempted; `Some(None)` when it was
    /// attempted and failed, which serializes as `null`.
    #[serde(
        rename = "audioUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_url: Option<Option<String>>,
    /// Estimated playback length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub quiz: Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideCourse {
    pub title: String,
    pub description: String,
    pub total_slides: u32,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCourse {
    pub title: String,
    pub description: String,
    pub total_sections: u32,
    pub sections: Vec<Section>,
}

/// A validated generation result. The variant fixes the unit shape, so slide
/// and section units can never be mixed within one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedCourse {
    Slides(SlideCourse),
    Video(SectionCourse),
    Audio(SectionCourse),
}

impl GeneratedCourse {
    pub fn format(&self) -> CourseFormat {
        match self {
            Self::Slides(_) => CourseFormat::Slides,
            Self::Video(_) => CourseFormat::Video,
            Self::Audio(_) => CourseFormat::Audio,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Slides(c) => &c.title,
            Self::Video(c) | Self::Audio(c) => &c.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Slides(c) => &c.description,
            Self::Video(c) | Self::Audio(c) => &c.description,
        }
    }

    pub fn unit_count(&self) -> usize {
        match self {
            Self::Slides(c) => c.slides.len(),
            Self::Video(c) | Self::Audio(c) => c.sections.len(),
        }
    }

    /// Quizzes in unit order
    pub fn quizzes(&self) -> Vec<&Quiz> {
        match self {
            Self::Slides(c) => c.slides.iter().map(|s| &s.quiz).collect(),
            Self::Video(c) | Self::Audio(c) => c.sections.iter().map(|s| &s.quiz).collect(),
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    #[serde(rename = "All Levels")]
    AllLevels,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::AllLevels => "All Levels",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Science,
    Business,
    Arts,
    Health,
    Language,
    Mathematics,
    History,
    Lifestyle,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Science => "Science",
            Self::Business => "Business",
            Self::Arts => "Arts",
            Self::Health => "Health",
            Self::Language => "Language",
            Self::Mathematics => "Mathematics",
            Self::History => "History",
            Self::Lifestyle => "Lifestyle",
            Self::Other => "Other",
        }
    }
}

/// Descriptive fields supplied by the author when a course is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseMetadata {
    pub difficulty: Difficulty,
    pub category: Category,
    pub creator: String,
    pub icon: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
}

impl Default for CourseMetadata {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            category: Category::default(),
            creator: "Miss Nova".to_string(),
            icon: None,
            tags: Vec::new(),
            is_published: true,
        }
    }
}
