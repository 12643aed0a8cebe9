//! Repository for the `chapter_progress` and `watch_intervals` tables.
//!
//! Interval rows are only ever written through
//! [`WatchProgressRepo::ingest_interval`], which keeps the stored set for
//! each record canonical: disjoint, sorted by start position, and exactly
//! equal to the merge of everything reported so far.

use praxis_core::interval::{merge_spans, MergedSpans, Span};
use praxis_core::progress::{chapter_progress, is_completed};
use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::{ChapterProgress, WatchInterval};

/// Column list for `chapter_progress` queries.
const PROGRESS_COLUMNS: &str = "id, user_id, chapter_id, course_id, watched_secs, progress, \
     is_completed, last_watched_at, created_at, updated_at";

/// Column list for `watch_intervals` queries.
const INTERVAL_COLUMNS: &str = "id, chapter_progress_id, user_id, chapter_id, start_secs, \
     end_secs, duration_secs, created_at";

/// Outcome of one interval ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The progress record after recomputation.
    pub record: ChapterProgress,
    /// The record's canonical interval rows, ascending by start position.
    pub intervals: Vec<WatchInterval>,
    /// Whether the reported span coalesced with stored history rather than
    /// landing as a new disjoint interval.
    pub merged: bool,
}

/// Access to chapter progress records and their watch intervals.
pub struct WatchProgressRepo;

impl WatchProgressRepo {
    /// Find the progress record for a (user, chapter) pair.
    pub async fn find_for_user_chapter(
        pool: &PgPool,
        user_id: DbId,
        chapter_id: DbId,
    ) -> Result<Option<ChapterProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM chapter_progress \
             WHERE user_id = $1 AND chapter_id = $2"
        );
        sqlx::query_as::<_, ChapterProgress>(&query)
            .bind(user_id)
            .bind(chapter_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of a user's progress records, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ChapterProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM chapter_progress \
             WHERE user_id = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, ChapterProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's progress records within one course, most recently
    /// updated first.
    pub async fn list_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<ChapterProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM chapter_progress \
             WHERE user_id = $1 AND course_id = $2 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, ChapterProgress>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// List a record's canonical interval rows, ascending by start position.
    pub async fn intervals_for_record(
        pool: &PgPool,
        record_id: DbId,
    ) -> Result<Vec<WatchInterval>, sqlx::Error> {
        let query = format!(
            "SELECT {INTERVAL_COLUMNS} FROM watch_intervals \
             WHERE chapter_progress_id = $1 \
             ORDER BY start_secs ASC"
        );
        sqlx::query_as::<_, WatchInterval>(&query)
            .bind(record_id)
            .fetch_all(pool)
            .await
    }

    /// List all of a user's interval rows across one course, grouped by
    /// chapter and ascending by start position within each chapter.
    pub async fn intervals_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<WatchInterval>, sqlx::Error> {
        sqlx::query_as::<_, WatchInterval>(
            "SELECT wi.id, wi.chapter_progress_id, wi.user_id, wi.chapter_id, \
                    wi.start_secs, wi.end_secs, wi.duration_secs, wi.created_at \
             FROM watch_intervals wi \
             JOIN chapter_progress cp ON cp.id = wi.chapter_progress_id \
             WHERE cp.user_id = $1 AND cp.course_id = $2 \
             ORDER BY wi.chapter_id ASC, wi.start_secs ASC",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Ingest one validated span for a (user, chapter) pair.
    ///
    /// Runs as a single transaction:
    /// 1. Upsert the progress record. The `DO UPDATE` arm fires even when
    ///    the row already exists so `RETURNING` always yields it, and the
    ///    row lock it takes serializes concurrent reports for the same
    ///    (user, chapter).
    /// 2. Merge the reported span with the stored canonical set.
    /// 3. Replace only the stored rows the merge superseded; rows whose
    ///    exact span survived are left untouched.
    /// 4. Recompute the record's cached figures from the merged coverage.
    ///
    /// `duration_secs` is the chapter's nominal length, used for the
    /// percentage figure. The caller resolves the chapter and validates
    /// the span.
    pub async fn ingest_interval(
        pool: &PgPool,
        user_id: DbId,
        chapter_id: DbId,
        course_id: DbId,
        span: Span,
        duration_secs: f64,
    ) -> Result<IngestOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let upsert = format!(
            "INSERT INTO chapter_progress (user_id, chapter_id, course_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, chapter_id) DO UPDATE SET updated_at = NOW() \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ChapterProgress>(&upsert)
            .bind(user_id)
            .bind(chapter_id)
            .bind(course_id)
            .fetch_one(&mut *tx)
            .await?;

        let select_intervals = format!(
            "SELECT {INTERVAL_COLUMNS} FROM watch_intervals \
             WHERE chapter_progress_id = $1 \
             ORDER BY start_secs ASC"
        );
        let existing = sqlx::query_as::<_, WatchInterval>(&select_intervals)
            .bind(record.id)
            .fetch_all(&mut *tx)
            .await?;

        let mut spans: Vec<Span> = existing.iter().map(WatchInterval::span).collect();
        spans.push(span);
        let MergedSpans {
            spans: canonical,
            total_secs,
        } = merge_spans(spans);

        // The report coalesced with history unless it survived as its own
        // disjoint span, in which case the canonical set grew by one.
        let merged = canonical.len() <= existing.len();

        // Diff the canonical set against the stored rows. Merge output
        // carries endpoint values through unchanged, so exact comparison
        // identifies the rows that survived.
        let mut keep_ids: Vec<DbId> = Vec::new();
        let mut to_insert: Vec<Span> = Vec::new();
        for canon in &canonical {
            let survivor = existing.iter().find(|row| {
                row.start_secs == canon.start_secs && row.end_secs == canon.end_secs
            });
            match survivor {
                Some(row) => keep_ids.push(row.id),
                None => to_insert.push(*canon),
            }
        }

        if keep_ids.len() < existing.len() {
            if keep_ids.is_empty() {
                sqlx::query("DELETE FROM watch_intervals WHERE chapter_progress_id = $1")
                    .bind(record.id)
                    .execute(&mut *tx)
                    .await?;
            } else {
                sqlx::query(
                    "DELETE FROM watch_intervals \
                     WHERE chapter_progress_id = $1 AND id <> ALL($2)",
                )
                .bind(record.id)
                .bind(&keep_ids)
                .execute(&mut *tx)
                .await?;
            }
        }

        for span in &to_insert {
            sqlx::query(
                "INSERT INTO watch_intervals \
                     (chapter_progress_id, user_id, chapter_id, start_secs, end_secs, duration_secs) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(record.id)
            .bind(user_id)
            .bind(chapter_id)
            .bind(span.start_secs)
            .bind(span.end_secs)
            .bind(span.duration_secs())
            .execute(&mut *tx)
            .await?;
        }

        let figure = chapter_progress(total_secs, duration_secs);
        let completed = is_completed(figure);

        let update = format!(
            "UPDATE chapter_progress \
             SET watched_secs = $2, progress = $3, is_completed = $4, \
                 last_watched_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ChapterProgress>(&update)
            .bind(record.id)
            .bind(total_secs)
            .bind(figure)
            .bind(completed)
            .fetch_one(&mut *tx)
            .await?;

        let intervals = sqlx::query_as::<_, WatchInterval>(&select_intervals)
            .bind(record.id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(IngestOutcome {
            record,
            intervals,
            merged,
        })
    }

    /// Delete a user's progress record for a chapter; interval rows cascade.
    ///
    /// Returns the course id of the deleted record so the caller can
    /// re-aggregate the course figure, or `None` when no record existed.
    pub async fn delete_for_user_chapter(
        pool: &PgPool,
        user_id: DbId,
        chapter_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "DELETE FROM chapter_progress \
             WHERE user_id = $1 AND chapter_id = $2 \
             RETURNING course_id",
        )
        .bind(user_id)
        .bind(chapter_id)
        .fetch_optional(pool)
        .await
    }
}
