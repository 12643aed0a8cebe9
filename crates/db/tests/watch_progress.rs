//! Integration tests for watch-progress storage.
//!
//! Exercises the repository layer against a real database:
//! - Ingestion keeps the stored interval set canonical (disjoint, sorted)
//! - Touching and overlapping reports coalesce; untouched rows are stable
//! - Cached figures (watched_secs, progress, is_completed) recompute
//! - Course-level aggregation over enrollments
//! - Cascade delete of a progress record
//! - Concurrent reports for the same (user, chapter) lose nothing

use praxis_core::interval::Span;
use praxis_db::models::chapter::{Chapter, CreateChapter};
use praxis_db::models::course::{Course, CreateCourse};
use praxis_db::models::user::{CreateUser, User};
use praxis_db::repositories::{
    ChapterRepo, CourseRepo, EnrollmentRepo, UserRepo, WatchProgressRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@praxis.test"),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn seed_course(pool: &PgPool, title: &str) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            title: title.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_chapter(
    pool: &PgPool,
    course_id: i64,
    position: i32,
    duration_minutes: Option<f64>,
) -> Chapter {
    ChapterRepo::create(
        pool,
        &CreateChapter {
            course_id,
            title: format!("Chapter {position}"),
            position,
            duration_minutes,
            video_url: None,
        },
    )
    .await
    .unwrap()
}

/// One user, one course, one 10-minute chapter.
async fn seed_basic(pool: &PgPool) -> (User, Course, Chapter) {
    let user = seed_user(pool, "learner").await;
    let course = seed_course(pool, "Rust Basics").await;
    let chapter = seed_chapter(pool, course.id, 1, Some(10.0)).await;
    (user, course, chapter)
}

async fn ingest(
    pool: &PgPool,
    user_id: i64,
    chapter: &Chapter,
    start: f64,
    end: f64,
) -> praxis_db::repositories::watch_progress_repo::IngestOutcome {
    WatchProgressRepo::ingest_interval(
        pool,
        user_id,
        chapter.id,
        chapter.course_id,
        Span::new(start, end),
        chapter.duration_secs(),
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: First ingestion creates the record and one canonical row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_ingest_creates_record(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let outcome = ingest(&pool, user.id, &chapter, 0.0, 60.0).await;

    assert!(!outcome.merged);
    assert_eq!(outcome.record.user_id, user.id);
    assert_eq!(outcome.record.chapter_id, chapter.id);
    assert_eq!(outcome.record.course_id, chapter.course_id);
    assert_eq!(outcome.record.watched_secs, 60.0);
    assert_eq!(outcome.record.progress, 10.0);
    assert!(!outcome.record.is_completed);
    assert!(outcome.record.last_watched_at.is_some());

    assert_eq!(outcome.intervals.len(), 1);
    assert_eq!(outcome.intervals[0].start_secs, 0.0);
    assert_eq!(outcome.intervals[0].end_secs, 60.0);
    assert_eq!(outcome.intervals[0].duration_secs, 60.0);
}

// ---------------------------------------------------------------------------
// Test: Disjoint reports accumulate as sorted rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_disjoint_reports_stay_sorted(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    ingest(&pool, user.id, &chapter, 180.0, 240.0).await;
    let outcome = ingest(&pool, user.id, &chapter, 0.0, 60.0).await;

    assert!(!outcome.merged);
    assert_eq!(outcome.record.watched_secs, 120.0);

    let rows = WatchProgressRepo::intervals_for_record(&pool, outcome.record.id)
        .await
        .unwrap();
    let spans: Vec<(f64, f64)> = rows.iter().map(|r| (r.start_secs, r.end_secs)).collect();
    assert_eq!(spans, vec![(0.0, 60.0), (180.0, 240.0)]);
}

// ---------------------------------------------------------------------------
// Test: Touching reports coalesce into one stored row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_touching_reports_coalesce(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    ingest(&pool, user.id, &chapter, 0.0, 10.0).await;
    let outcome = ingest(&pool, user.id, &chapter, 10.0, 20.0).await;

    assert!(outcome.merged);
    assert_eq!(outcome.record.watched_secs, 20.0);
    assert_eq!(outcome.intervals.len(), 1);
    assert_eq!(outcome.intervals[0].start_secs, 0.0);
    assert_eq!(outcome.intervals[0].end_secs, 20.0);
}

// ---------------------------------------------------------------------------
// Test: Overlap replaces only the superseded rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_overlap_replaces_only_superseded_rows(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let first = ingest(&pool, user.id, &chapter, 0.0, 10.0).await;
    let untouched_id = first.intervals[0].id;

    ingest(&pool, user.id, &chapter, 20.0, 30.0).await;
    let outcome = ingest(&pool, user.id, &chapter, 25.0, 40.0).await;

    assert!(outcome.merged);
    let spans: Vec<(f64, f64)> = outcome
        .intervals
        .iter()
        .map(|r| (r.start_secs, r.end_secs))
        .collect();
    assert_eq!(spans, vec![(0.0, 10.0), (20.0, 40.0)]);

    // The row the merge never touched keeps its identity.
    assert_eq!(outcome.intervals[0].id, untouched_id);
    assert_eq!(outcome.record.watched_secs, 30.0);
}

// ---------------------------------------------------------------------------
// Test: A contained report changes nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_contained_report_changes_nothing(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let first = ingest(&pool, user.id, &chapter, 0.0, 120.0).await;
    let original_id = first.intervals[0].id;

    let outcome = ingest(&pool, user.id, &chapter, 30.0, 60.0).await;

    assert!(outcome.merged);
    assert_eq!(outcome.record.watched_secs, 120.0);
    assert_eq!(outcome.intervals.len(), 1);
    assert_eq!(outcome.intervals[0].id, original_id);
}

// ---------------------------------------------------------------------------
// Test: Repeating the same report is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_repeat_report_is_idempotent(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let first = ingest(&pool, user.id, &chapter, 15.0, 45.0).await;
    let second = ingest(&pool, user.id, &chapter, 15.0, 45.0).await;

    assert!(second.merged);
    assert_eq!(second.record.watched_secs, first.record.watched_secs);
    assert_eq!(second.record.progress, first.record.progress);
    assert_eq!(second.intervals.len(), 1);
    assert_eq!(second.intervals[0].id, first.intervals[0].id);
}

// ---------------------------------------------------------------------------
// Test: Full coverage completes the chapter, exactly at the boundary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_full_coverage_completes_chapter(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let partial = ingest(&pool, user.id, &chapter, 0.0, 599.999).await;
    assert!(partial.record.progress < 100.0);
    assert!(!partial.record.is_completed);

    let full = ingest(&pool, user.id, &chapter, 0.0, 600.0).await;
    assert_eq!(full.record.progress, 100.0);
    assert!(full.record.is_completed);
}

// ---------------------------------------------------------------------------
// Test: Watching past the nominal duration caps progress at 100
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_overshoot_caps_progress(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;

    let outcome = ingest(&pool, user.id, &chapter, 0.0, 700.0).await;

    assert_eq!(outcome.record.watched_secs, 700.0);
    assert_eq!(outcome.record.progress, 100.0);
    assert!(outcome.record.is_completed);
}

// ---------------------------------------------------------------------------
// Test: A chapter without a duration accumulates time at zero progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_chapter_without_duration_stays_at_zero(pool: PgPool) {
    let user = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, "Drafts").await;
    let chapter = seed_chapter(&pool, course.id, 1, None).await;

    let outcome = ingest(&pool, user.id, &chapter, 0.0, 500.0).await;

    assert_eq!(outcome.record.watched_secs, 500.0);
    assert_eq!(outcome.record.progress, 0.0);
    assert!(!outcome.record.is_completed);
}

// ---------------------------------------------------------------------------
// Test: Course aggregation averages over all chapters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_recompute_progress_averages_all_chapters(pool: PgPool) {
    let user = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, "Rust Basics").await;
    let ch1 = seed_chapter(&pool, course.id, 1, Some(10.0)).await;
    let ch2 = seed_chapter(&pool, course.id, 2, Some(10.0)).await;
    let _ch3 = seed_chapter(&pool, course.id, 3, Some(10.0)).await;
    EnrollmentRepo::create(&pool, user.id, course.id).await.unwrap();

    ingest(&pool, user.id, &ch1, 0.0, 600.0).await;
    ingest(&pool, user.id, &ch2, 0.0, 300.0).await;

    let figure = EnrollmentRepo::recompute_progress(&pool, user.id, course.id)
        .await
        .unwrap();
    assert_eq!(figure, Some(50.0));

    let enrollment = EnrollmentRepo::find_for_user_course(&pool, user.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.progress, 50.0);
}

// ---------------------------------------------------------------------------
// Test: Aggregation without an enrollment is a no-op
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_recompute_progress_without_enrollment(pool: PgPool) {
    let (user, course, chapter) = seed_basic(&pool).await;

    ingest(&pool, user.id, &chapter, 0.0, 600.0).await;

    let figure = EnrollmentRepo::recompute_progress(&pool, user.id, course.id)
        .await
        .unwrap();
    assert_eq!(figure, None);
}

// ---------------------------------------------------------------------------
// Test: Deleting a record cascades to its interval rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_record_cascades_intervals(pool: PgPool) {
    let (user, course, chapter) = seed_basic(&pool).await;

    ingest(&pool, user.id, &chapter, 0.0, 60.0).await;
    ingest(&pool, user.id, &chapter, 120.0, 180.0).await;

    let deleted = WatchProgressRepo::delete_for_user_chapter(&pool, user.id, chapter.id)
        .await
        .unwrap();
    assert_eq!(deleted, Some(course.id));

    let record = WatchProgressRepo::find_for_user_chapter(&pool, user.id, chapter.id)
        .await
        .unwrap();
    assert!(record.is_none());

    let orphans: Option<i64> = sqlx::query_scalar(
        "SELECT COUNT(*) FROM watch_intervals WHERE user_id = $1 AND chapter_id = $2",
    )
    .bind(user.id)
    .bind(chapter.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans.unwrap_or(0), 0);

    let gone = WatchProgressRepo::delete_for_user_chapter(&pool, user.id, chapter.id)
        .await
        .unwrap();
    assert_eq!(gone, None);
}

// ---------------------------------------------------------------------------
// Test: Concurrent reports for one (user, chapter) lose nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_reports_lose_nothing(pool: PgPool) {
    let (user, _course, chapter) = seed_basic(&pool).await;
    let duration_secs = chapter.duration_secs();

    let first = tokio::spawn({
        let pool = pool.clone();
        let chapter_id = chapter.id;
        let course_id = chapter.course_id;
        let user_id = user.id;
        async move {
            WatchProgressRepo::ingest_interval(
                &pool,
                user_id,
                chapter_id,
                course_id,
                Span::new(0.0, 60.0),
                duration_secs,
            )
            .await
        }
    });
    let second = tokio::spawn({
        let pool = pool.clone();
        let chapter_id = chapter.id;
        let course_id = chapter.course_id;
        let user_id = user.id;
        async move {
            WatchProgressRepo::ingest_interval(
                &pool,
                user_id,
                chapter_id,
                course_id,
                Span::new(120.0, 180.0),
                duration_secs,
            )
            .await
        }
    });

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let record = WatchProgressRepo::find_for_user_chapter(&pool, user.id, chapter.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.watched_secs, 120.0);
    assert_eq!(record.progress, 20.0);

    let rows = WatchProgressRepo::intervals_for_record(&pool, record.id)
        .await
        .unwrap();
    let spans: Vec<(f64, f64)> = rows.iter().map(|r| (r.start_secs, r.end_secs)).collect();
    assert_eq!(spans, vec![(0.0, 60.0), (120.0, 180.0)]);
}
