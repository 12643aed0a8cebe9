//! Interval ingestion and course-level progress computation.
//!
//! [`report_interval`] is the single write path for watch history: it
//! validates the reported span, resolves the chapter, and hands the merge
//! to the storage layer's transactional ingest. Course aggregation runs
//! afterwards in its own transaction and is recomputed from scratch each
//! time, so a failed aggregation never corrupts anything; the next one
//! converges on the same figure.

use std::collections::HashMap;

use praxis_core::error::CoreError;
use praxis_core::interval::{merge_spans, validate_span, Span};
use praxis_core::progress::{chapter_progress, course_progress};
use praxis_core::types::DbId;
use praxis_db::repositories::watch_progress_repo::IngestOutcome;
use praxis_db::repositories::{ChapterRepo, EnrollmentRepo, WatchProgressRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Ingest one reported span for a (user, chapter) pair.
///
/// Validates the span, resolves the chapter (404 when absent), runs the
/// transactional merge, then recomputes the owning course's enrollment
/// figure. Returns the storage outcome: the updated record, the canonical
/// interval set, and whether the report coalesced with stored history.
pub async fn report_interval(
    pool: &PgPool,
    user_id: DbId,
    chapter_id: DbId,
    span: Span,
) -> AppResult<IngestOutcome> {
    validate_span(&span)?;

    let chapter = ChapterRepo::find_by_id(pool, chapter_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chapter",
            id: chapter_id,
        }))?;

    let outcome = WatchProgressRepo::ingest_interval(
        pool,
        user_id,
        chapter_id,
        chapter.course_id,
        span,
        chapter.duration_secs(),
    )
    .await?;

    tracing::info!(
        user_id,
        chapter_id,
        watched_secs = outcome.record.watched_secs,
        progress = outcome.record.progress,
        merged = outcome.merged,
        "Watch interval ingested"
    );

    recompute_course_progress(pool, user_id, chapter.course_id).await;

    Ok(outcome)
}

/// Recompute and store the course-level figure for a (user, course) pair.
///
/// A missing enrollment is a no-op: learners may preview chapters of
/// courses they have not enrolled in, and their chapter records still
/// count. Failures are logged rather than propagated; the chapter-level
/// write has already committed and a later aggregation recomputes the
/// same figure.
pub async fn recompute_course_progress(pool: &PgPool, user_id: DbId, course_id: DbId) {
    match EnrollmentRepo::recompute_progress(pool, user_id, course_id).await {
        Ok(Some(progress)) => {
            tracing::debug!(user_id, course_id, progress, "Course progress recomputed");
        }
        Ok(None) => {
            tracing::debug!(user_id, course_id, "No enrollment to update");
        }
        Err(e) => {
            tracing::error!(
                user_id,
                course_id,
                error = %e,
                "Failed to recompute course progress",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Course progress read model
// ---------------------------------------------------------------------------

/// Per-chapter slice of a course progress computation.
#[derive(Debug, Serialize)]
pub struct ChapterProgressSummary {
    pub chapter_id: DbId,
    pub chapter_title: String,
    pub watched_secs: f64,
    pub duration_secs: f64,
    pub progress: f64,
}

/// A user's progress across one course, recomputed from stored intervals.
#[derive(Debug, Serialize)]
pub struct CourseProgressSummary {
    pub course_id: DbId,
    pub progress: f64,
    pub total_chapters: usize,
    pub chapters: Vec<ChapterProgressSummary>,
}

/// Compute a user's course progress directly from stored interval rows.
///
/// Re-merges each chapter's intervals instead of trusting the cached record
/// figures, so the response is correct even against a stale cache. Every
/// chapter of the course appears in the result; chapters without watch
/// history report 0 and drag the mean down accordingly.
pub async fn fresh_course_progress(
    pool: &PgPool,
    user_id: DbId,
    course_id: DbId,
) -> Result<CourseProgressSummary, sqlx::Error> {
    let chapters = ChapterRepo::list_for_course(pool, course_id).await?;
    let intervals = WatchProgressRepo::intervals_for_user_course(pool, user_id, course_id).await?;

    let mut spans_by_chapter: HashMap<DbId, Vec<Span>> = HashMap::new();
    for row in &intervals {
        spans_by_chapter
            .entry(row.chapter_id)
            .or_default()
            .push(row.span());
    }

    let mut summaries = Vec::with_capacity(chapters.len());
    let mut figures = Vec::with_capacity(chapters.len());

    for chapter in &chapters {
        let spans = spans_by_chapter.remove(&chapter.id).unwrap_or_default();
        let merged = merge_spans(spans);
        let duration_secs = chapter.duration_secs();
        let figure = chapter_progress(merged.total_secs, duration_secs);

        figures.push(figure);
        summaries.push(ChapterProgressSummary {
            chapter_id: chapter.id,
            chapter_title: chapter.title.clone(),
            watched_secs: merged.total_secs,
            duration_secs,
            progress: figure,
        });
    }

    Ok(CourseProgressSummary {
        course_id,
        progress: course_progress(&figures, chapters.len()),
        total_chapters: chapters.len(),
        chapters: summaries,
    })
}
