//! Chapter entity model.

use praxis_core::progress::chapter_duration_secs;
use praxis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `chapters` table.
///
/// `duration_minutes` is the nominal video length; it is `None` for
/// chapters whose video has not been uploaded yet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub position: i32,
    pub duration_minutes: Option<f64>,
    pub video_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chapter {
    /// Nominal chapter length in seconds (0 when no duration is set).
    pub fn duration_secs(&self) -> f64 {
        chapter_duration_secs(self.duration_minutes)
    }
}

/// DTO for creating a chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChapter {
    pub course_id: DbId,
    pub title: String,
    pub position: i32,
    pub duration_minutes: Option<f64>,
    pub video_url: Option<String>,
}
