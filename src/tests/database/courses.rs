//! Course Database Tests
//!
//! Round trips through `CourseOps`, cascade deletes and the schema's
//! constraints.

use crate::core::course::{normalize, CourseMetadata, Difficulty};
use crate::database::{ContentUnits, CourseOps, QuizOwner, QuizRecord};
use crate::tests::common::{audio_course, create_test_db, slide_course, test_quiz};

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_and_get_slide_course() {
    let (db, _temp) = create_test_db().await;
    let normalized = normalize(&slide_course(3), CourseMetadata::default());

    db.create_course(&normalized).await.expect("Failed to create course");

    let course = db
        .get_course(&normalized.course.id)
        .await
        .expect("Failed to get course")
        .expect("Course not found");
    assert_eq!(course, normalized.course);

    let slides = db.get_course_slides(&course.id).await.unwrap();
    assert_eq!(slides.len(), 3);
    assert_eq!(
        slides.iter().map(|s| s.slide_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let quizzes = db.get_course_quizzes(&course.id).await.unwrap();
    assert_eq!(quizzes.len(), 3);
    assert!(quizzes.iter().all(|q| q.slide_id.is_some() && q.section_id.is_none()));
}

#[tokio::test]
async fn test_get_course_detail_nests_quizzes() {
    let (db, _temp) = create_test_db().await;
    let normalized = normalize(&slide_course(2), CourseMetadata::default());
    db.create_course(&normalized).await.unwrap();

    let detail = db
        .get_course_detail(&normalized.course.id)
        .await
        .unwrap()
        .expect("Course not found");

    assert_eq!(detail.total_slides, Some(2));
    let slides = detail.slides.expect("slides missing");
    assert_eq!(slides[0].quiz.as_ref().unwrap(), &test_quiz("s1"));
    assert_eq!(slides[1].quiz.as_ref().unwrap(), &test_quiz("s2"));
    assert!(detail.sections.is_none());
}

#[tokio::test]
async fn test_audio_sections_round_trip() {
    let (db, _temp) = create_test_db().await;
    let normalized = normalize(&audio_course(2), CourseMetadata::default());
    db.create_course(&normalized).await.unwrap();

    let sections = db.get_course_sections(&normalized.course.id).await.unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].key_points.0, vec!["point 1".to_string()]);
    assert!(sections[0].script.as_deref().unwrap().starts_with("Speaker 1:"));
    assert!(sections[0].audio_url.is_none());

    let detail = db.get_course_detail(&normalized.course.id).await.unwrap().unwrap();
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["type"], "audio");
    assert!(json.get("total_slides").is_none());
    assert_eq!(json["sections"][1]["quiz"]["correct_answer"], "x2 B");
}

#[tokio::test]
async fn test_get_missing_course() {
    let (db, _temp) = create_test_db().await;
    assert!(db.get_course("nope").await.unwrap().is_none());
    assert!(db.get_course_detail("nope").await.unwrap().is_none());
}

// =============================================================================
// Listing and Publishing
// =============================================================================

#[tokio::test]
async fn test_list_published_newest_first() {
    let (db, _temp) = create_test_db().await;

    let mut older = normalize(&slide_course(1), CourseMetadata::default());
    older.course.created_at = "2024-01-01T00:00:00+00:00".to_string();
    let mut newer = normalize(&slide_course(1), CourseMetadata::default());
    newer.course.created_at = "2024-06-01T00:00:00+00:00".to_string();
    let hidden = normalize(
        &slide_course(1),
        CourseMetadata {
            is_published: false,
            ..CourseMetadata::default()
        },
    );

    for c in [&older, &newer, &hidden] {
        db.create_course(c).await.unwrap();
    }

    let listed = db.list_published_courses().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![newer.course.id.as_str(), older.course.id.as_str()]);
}

#[tokio::test]
async fn test_set_course_published() {
    let (db, _temp) = create_test_db().await;
    let normalized = normalize(
        &slide_course(1),
        CourseMetadata {
            is_published: false,
            difficulty: Difficulty::Advanced,
            ..CourseMetadata::default()
        },
    );
    db.create_course(&normalized).await.unwrap();
    assert!(db.list_published_courses().await.unwrap().is_empty());

    assert!(db.set_course_published(&normalized.course.id, true).await.unwrap());
    let listed = db.list_published_courses().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].difficulty, "Advanced");

    assert!(!db.set_course_published("missing", true).await.unwrap());
}

// =============================================================================
// Delete and Constraints
// =============================================================================

#[tokio::test]
async fn test_delete_course_cascades() {
    let (db, _temp) = create_test_db().await;
    let normalized = normalize(&audio_course(3), CourseMetadata::default());
    let id = normalized.course.id.clone();
    db.create_course(&normalized).await.unwrap();

    assert!(db.delete_course(&id).await.unwrap());
    assert!(db.get_course(&id).await.unwrap().is_none());
    assert!(db.get_course_sections(&id).await.unwrap().is_empty());
    assert!(db.get_course_quizzes(&id).await.unwrap().is_empty());
    assert!(!db.delete_course(&id).await.unwrap());
}

#[tokio::test]
async fn test_failed_save_leaves_nothing_behind() {
    let (db, _temp) = create_test_db().await;
    let mut normalized = normalize(&slide_course(2), CourseMetadata::default());

    // Duplicate ordinal violates UNIQUE(course_id, slide_number)
    if let ContentUnits::Slides(slides) = &mut normalized.units {
        slides[1].slide_number = 1;
    }

    assert!(db.create_course(&normalized).await.is_err());
    assert!(db.get_course(&normalized.course.id).await.unwrap().is_none());
    assert!(db.get_course_slides(&normalized.course.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quiz_must_have_exactly_one_owner() {
    let (db, _temp) = create_test_db().await;
    let mut normalized = normalize(&slide_course(1), CourseMetadata::default());
    let slide_id = match &normalized.units {
        ContentUnits::Slides(s) => s[0].id.clone(),
        ContentUnits::Sections(_) => unreachable!(),
    };

    let mut orphan = QuizRecord::new(&normalized.course.id, QuizOwner::Slide(&slide_id), &test_quiz("o"));
    orphan.slide_id = None;
    normalized.quizzes.push(orphan);

    assert!(db.create_course(&normalized).await.is_err());
    assert!(db.get_course(&normalized.course.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (db, _temp) = create_test_db().await;
    crate::database::run_migrations(db.pool()).await.unwrap();
    let version = crate::database::migrations::get_current_version(db.pool()).await.unwrap();
    assert_eq!(version, 2);
}
