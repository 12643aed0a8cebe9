//! Repository for the `courses` table.

use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse};

/// Column list for `courses` queries.
const COLUMNS: &str = "id, title, description, created_at, updated_at";

/// Read/create access to courses. Course CRUD proper is owned by the
/// course service; creation exists for fixtures and local tooling.
pub struct CourseRepo;

impl CourseRepo {
    /// Create a course.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, description) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a course by id.
    pub async fn find_by_id(pool: &PgPool, course_id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }
}
