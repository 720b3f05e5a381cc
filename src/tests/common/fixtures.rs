//! Test Fixtures
//!
//! Temporary databases and small, valid generated courses.

use tempfile::TempDir;

use crate::core::course::{
    GeneratedCourse, Quiz, Section, SectionCourse, Slide, SlideCourse,
};
use crate::database::Database;

// =============================================================================
// Database Fixtures
// =============================================================================

/// Create a test database in a temporary directory.
/// Returns both the database and the TempDir (which must be kept alive).
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(temp_dir.path())
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

// =============================================================================
// Course Fixtures
// =============================================================================

pub fn test_quiz(tag: &str) -> Quiz {
    Quiz {
        question: format!("Question {}?", tag),
        options: vec![
            format!("{} A", tag),
            format!("{} B", tag),
            format!("{} C", tag),
            format!("{} D", tag),
        ],
        correct_answer: format!("{} B", tag),
        explanation: format!("{} B is right", tag),
    }
}

pub fn slide_course(count: u32) -> GeneratedCourse {
    GeneratedCourse::Slides(SlideCourse {
        title: "Intro to Rust".to_string(),
        description: "Ownership and borrowing".to_string(),
        total_slides: count,
        slides: (1..=count)
            .map(|n| Slide {
                slide_number: n,
                title: format!("Slide {}", n),
                content: format!("Content {}", n),
                quiz: test_quiz(&format!("s{}", n)),
            })
            .collect(),
    })
}

pub fn audio_course(count: u32) -> GeneratedCourse {
    GeneratedCourse::Audio(SectionCourse {
        title: "Podcast on Tides".to_string(),
        description: "Why the sea moves".to_string(),
        total_sections: count,
        sections: (1..=count)
            .map(|n| Section {
                section_number: n,
                title: format!("Section {}", n),
                content: format!("Content {}", n),
                key_points: vec![format!("point {}", n)],
                script: Some(format!("Speaker 1: Part {}\nSpeaker 2: Indeed", n)),
                audio_url: Some(None),
                duration: None,
                quiz: test_quiz(&format!("x{}", n)),
            })
            .collect(),
    })
}
