//! Database Models
//!
//! - [`course`] - courses, slides, sections and quizzes

pub mod course;


pub use course::{
    ContentUnits,
    CourseRecord,
    QuizOwner,
    QuizRecord,
    SectionRecord,
    SlideRecord,
};
