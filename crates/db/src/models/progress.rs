//! Watch-progress entity models.

use praxis_core::interval::Span;
use praxis_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `chapter_progress` table.
///
/// `watched_secs`, `progress`, and `is_completed` are caches derived from
/// the record's merged `watch_intervals` rows; they are recomputed on every
/// ingestion and never written directly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChapterProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub chapter_id: DbId,
    pub course_id: DbId,
    pub watched_secs: f64,
    pub progress: f64,
    pub is_completed: bool,
    pub last_watched_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `watch_intervals` table, one canonical merged interval.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchInterval {
    pub id: DbId,
    pub chapter_progress_id: DbId,
    pub user_id: DbId,
    pub chapter_id: DbId,
    pub start_secs: f64,
    pub end_secs: f64,
    pub duration_secs: f64,
    pub created_at: Timestamp,
}

impl WatchInterval {
    /// View this row as a pure merge span.
    pub fn span(&self) -> Span {
        Span::new(self.start_secs, self.end_secs)
    }
}
