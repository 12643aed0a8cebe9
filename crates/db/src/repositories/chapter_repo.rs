//! Repository for the `chapters` table.

use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::chapter::{Chapter, CreateChapter};

/// Column list for `chapters` queries.
const COLUMNS: &str =
    "id, course_id, title, position, duration_minutes, video_url, created_at, updated_at";

/// Read/create access to chapters. Chapter CRUD proper is owned by the
/// course service; creation exists for fixtures and local tooling.
pub struct ChapterRepo;

impl ChapterRepo {
    /// Create a chapter.
    pub async fn create(pool: &PgPool, input: &CreateChapter) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters (course_id, title, position, duration_minutes, video_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(input.position)
            .bind(input.duration_minutes)
            .bind(&input.video_url)
            .fetch_one(pool)
            .await
    }

    /// Find a chapter by id.
    pub async fn find_by_id(
        pool: &PgPool,
        chapter_id: DbId,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = $1");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(chapter_id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's chapters in display order.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Chapter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chapters \
             WHERE course_id = $1 \
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }
}
