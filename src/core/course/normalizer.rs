//! Course Normalizer
//!
//! Generated courses nest each quiz inside its unit; storage keeps quizzes in
//! their own table keyed by the owning unit. `normalize` splits a generated
//! course into records and [`CourseDetail::assemble`] joins them back for
//! display.

use serde::Serialize;

use super::types::{CourseMetadata, GeneratedCourse, Quiz};
use crate::database::models::{
    ContentUnits, CourseRecord, QuizOwner, QuizRecord, SectionRecord, SlideRecord,
};

/// A course split into the rows it is stored as.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCourse {
    pub course: CourseRecord,
    pub units: ContentUnits,
    pub quizzes: Vec<QuizRecord>,
}

/// Split a validated course into records.
///
/// Ordinals are renumbered 1..=n in array order, so `[2, 5, 1]` is stored as
/// `[1, 2, 3]` with the units' relative order untouched.
pub fn normalize(generated: &GeneratedCourse, metadata: CourseMetadata) -> NormalizedCourse {
    let course = CourseRecord::new(
        generated.title().to_string(),
        generated.description().to_string(),
        generated.format(),
        &metadata,
    );

    let mut quizzes = Vec::with_capacity(generated.unit_count());
    let units = match generated {
        GeneratedCourse::Slides(c) => ContentUnits::Slides(
            c.slides
                .iter()
                .enumerate()
                .map(|(i, slide)| {
                    let record = SlideRecord::new(
                        &course.id,
                        i as i32 + 1,
                        slide.title.clone(),
                        slide.content.clone(),
                    );
                    quizzes.push(QuizRecord::new(&course.id, QuizOwner::Slide(&record.id), &slide.quiz));
                    record
                })
                .collect(),
        ),
        GeneratedCourse::Video(c) | GeneratedCourse::Audio(c) => ContentUnits::Sections(
            c.sections
                .iter()
                .enumerate()
                .map(|(i, section)| {
                    let mut record = SectionRecord::new(
                        &course.id,
                        i as i32 + 1,
                        section.title.clone(),
                        section.content.clone(),
                    );
                    record.key_points = sqlx::types::Json(section.key_points.clone());
                    record.script = section.script.clone();
                    record.audio_url = section.audio_url.clone().flatten();
                    // Validated sections never exceed `i32::MAX`.
                    record.duration = section.duration.and_then(|d| i32::try_from(d).ok());
                    quizzes.push(QuizRecord::new(&course.id, QuizOwner::Section(&record.id), &section.quiz));
                    record
                })
                .collect(),
        ),
    };

    NormalizedCourse {
        course,
        units,
        quizzes,
    }
}

// ============================================================================
// Display Assembly
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideView {
    #[serde(flatten)]
    pub slide: SlideRecord,
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    #[serde(flatten)]
    pub section: SectionRecord,
    pub quiz: Option<Quiz>,
}

/// A stored course merged with its units, each carrying its quiz (or `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slides: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<SlideView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionView>>,
}

impl CourseDetail {
    pub fn assemble(course: CourseRecord, units: ContentUnits, quizzes: &[QuizRecord]) -> Self {
        let quiz_for = |owner: QuizOwner<'_>| {
            quizzes
                .iter()
                .find(|q| q.owner() == Some(owner))
                .map(QuizRecord::to_quiz)
        };

        match units {
            ContentUnits::Slides(slides) => {
                let views: Vec<SlideView> = slides
                    .into_iter()
                    .map(|slide| {
                        let quiz = quiz_for(QuizOwner::Slide(&slide.id));
                        SlideView { slide, quiz }
                    })
                    .collect();
                Self {
                    course,
                    total_slides: Some(views.len()),
                    slides: Some(views),
                    sections: None,
                }
            }
            ContentUnits::Sections(sections) => Self {
                course,
                total_slides: None,
                slides: None,
                sections: Some(
                    sections
                        .into_iter()
                        .map(|section| {
                            let quiz = quiz_for(QuizOwner::Section(&section.id));
                            SectionView { section, quiz }
                        })
                        .collect(),
                ),
            },
        }
    }
}
