//! Course database operations
//!
//! A course, its units and its quizzes are written in one transaction so a
//! failed save leaves nothing behind.

use super::models::{ContentUnits, CourseRecord, QuizRecord, SectionRecord, SlideRecord};
use super::Database;
use crate::core::course::{CourseDetail, CourseFormat, NormalizedCourse};

/// Extension trait for course-related database operations
pub trait CourseOps {
    fn create_course(&self, course: &NormalizedCourse) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_course(&self, id: &str) -> impl std::future::Future<Output = Result<Option<CourseRecord>, sqlx::Error>> + Send;
    fn list_published_courses(&self) -> impl std::future::Future<Output = Result<Vec<CourseRecord>, sqlx::Error>> + Send;
    fn set_course_published(&self, id: &str, published: bool) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn delete_course(&self, id: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;

    // Units and quizzes
    fn get_course_slides(&self, course_id: &str) -> impl std::future::Future<Output = Result<Vec<SlideRecord>, sqlx::Error>> + Send;
    fn get_course_sections(&self, course_id: &str) -> impl std::future::Future<Output = Result<Vec<SectionRecord>, sqlx::Error>> + Send;
    fn get_course_quizzes(&self, course_id: &str) -> impl std::future::Future<Output = Result<Vec<QuizRecord>, sqlx::Error>> + Send;
    fn get_course_detail(&self, id: &str) -> impl std::future::Future<Output = Result<Option<CourseDetail>, sqlx::Error>> + Send;
}

impl CourseOps for Database {
    // =========================================================================
    // Course Operations
    // =========================================================================

    async fn create_course(&self, normalized: &NormalizedCourse) -> Result<(), sqlx::Error> {
        let course = &normalized.course;
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, type, difficulty, category, creator,
                icon, tags, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.course_type)
        .bind(&course.difficulty)
        .bind(&course.category)
        .bind(&course.creator)
        .bind(&course.icon)
        .bind(&course.tags)
        .bind(course.is_published)
        .bind(&course.created_at)
        .bind(&course.updated_at)
        .execute(&mut *tx)
        .await?;

        match &normalized.units {
            ContentUnits::Slides(slides) => {
                for slide in slides {
                    sqlx::query(
                        r#"
                        INSERT INTO course_slides (id, course_id, slide_number, title, content, created_at)
                        VALUES (?, ?, ?, ?, ?, ?)
                        "#
                    )
                    .bind(&slide.id)
                    .bind(&slide.course_id)
                    .bind(slide.slide_number)
                    .bind(&slide.title)
                    .bind(&slide.content)
                    .bind(&slide.created_at)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            ContentUnits::Sections(sections) => {
                for section in sections {
                    sqlx::query(
                        r#"
                        INSERT INTO course_sections (id, course_id, section_number, title, content,
                            key_points, script, audio_url, duration, created_at)
                        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                        "#
                    )
                    .bind(&section.id)
                    .bind(&section.course_id)
                    .bind(section.section_number)
                    .bind(&section.title)
                    .bind(&section.content)
                    .bind(&section.key_points)
                    .bind(&section.script)
                    .bind(&section.audio_url)
                    .bind(section.duration)
                    .bind(&section.created_at)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        for quiz in &normalized.quizzes {
            sqlx::query(
                r#"
                INSERT INTO quizzes (id, course_id, slide_id, section_id, question, options,
                    correct_answer, explanation, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#
            )
            .bind(&quiz.id)
            .bind(&quiz.course_id)
            .bind(&quiz.slide_id)
            .bind(&quiz.section_id)
            .bind(&quiz.question)
            .bind(&quiz.options)
            .bind(&quiz.correct_answer)
            .bind(&quiz.explanation)
            .bind(&quiz.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "Saved course {} ({}, {} units)",
            course.id,
            course.course_type,
            normalized.units.len()
        );
        Ok(())
    }

    async fn get_course(&self, id: &str) -> Result<Option<CourseRecord>, sqlx::Error> {
        sqlx::query_as::<_, CourseRecord>("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    async fn list_published_courses(&self) -> Result<Vec<CourseRecord>, sqlx::Error> {
        sqlx::query_as::<_, CourseRecord>(
            "SELECT * FROM courses WHERE is_published = 1 ORDER BY created_at DESC"
        )
        .fetch_all(self.pool())
        .await
    }

    async fn set_course_published(&self, id: &str, published: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE courses SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(published)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_course(&self, id: &str) -> Result<bool, sqlx::Error> {
        // Units and quizzes go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Unit and Quiz Operations
    // =========================================================================

    async fn get_course_slides(&self, course_id: &str) -> Result<Vec<SlideRecord>, sqlx::Error> {
        sqlx::query_as::<_, SlideRecord>(
            "SELECT * FROM course_slides WHERE course_id = ? ORDER BY slide_number ASC"
        )
        .bind(course_id)
        .fetch_all(self.pool())
        .await
    }

    async fn get_course_sections(&self, course_id: &str) -> Result<Vec<SectionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SectionRecord>(
            "SELECT * FROM course_sections WHERE course_id = ? ORDER BY section_number ASC"
        )
        .bind(course_id)
        .fetch_all(self.pool())
        .await
    }

    async fn get_course_quizzes(&self, course_id: &str) -> Result<Vec<QuizRecord>, sqlx::Error> {
        sqlx::query_as::<_, QuizRecord>(
            "SELECT * FROM quizzes WHERE course_id = ? ORDER BY created_at ASC"
        )
        .bind(course_id)
        .fetch_all(self.pool())
        .await
    }

    async fn get_course_detail(&self, id: &str) -> Result<Option<CourseDetail>, sqlx::Error> {
        let Some(course) = self.get_course(id).await? else {
            return Ok(None);
        };

        let units = match course.format() {
            Some(CourseFormat::Slides) => ContentUnits::Slides(self.get_course_slides(id).await?),
            Some(CourseFormat::Video) | Some(CourseFormat::Audio) => {
                ContentUnits::Sections(self.get_course_sections(id).await?)
            }
            None => {
                log::warn!("Course {} has unknown type '{}'", id, course.course_type);
                ContentUnits::Sections(self.get_course_sections(id).await?)
            }
        };
        let quizzes = self.get_course_quizzes(id).await?;

        Ok(Some(CourseDetail::assemble(course, units, &quizzes)))
    }
}
