//! Repository for the `enrollments` table.

use praxis_core::progress::course_progress;
use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::Enrollment;

/// Column list for `enrollments` queries.
const COLUMNS: &str = "id, user_id, course_id, progress, enrolled_at, updated_at";

/// Access to enrollments. Enroll/unenroll is owned by the course service;
/// this layer reads enrollments and maintains their cached progress figure.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Create an enrollment.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user's enrollment in a course.
    pub async fn find_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Recompute and store the course-level progress figure for one
    /// enrollment.
    ///
    /// Locks the enrollment row with `SELECT FOR UPDATE` so concurrent
    /// recomputations for the same (user, course) serialize, then derives
    /// the arithmetic-mean figure from the user's chapter progress rows
    /// against the course's total chapter count and writes it back.
    ///
    /// Returns the stored figure, or `None` without writing anything when
    /// the user is not enrolled in the course.
    pub async fn recompute_progress(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<f64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE user_id = $1 AND course_id = $2 \
             FOR UPDATE"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?;

        let enrollment = match enrollment {
            Some(enrollment) => enrollment,
            None => return Ok(None),
        };

        let total_chapters: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&mut *tx)
                .await?;

        let figures: Vec<f64> = sqlx::query_scalar(
            "SELECT progress FROM chapter_progress \
             WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;

        let figure = course_progress(&figures, total_chapters.unwrap_or(0) as usize);

        sqlx::query(
            "UPDATE enrollments \
             SET progress = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(enrollment.id)
        .bind(figure)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(figure))
    }
}
