//! Enrollment entity model.

use praxis_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `enrollments` table.
///
/// `progress` is the cached course-level completion figure, maintained by
/// the course aggregation pass after every chapter-level write.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub progress: f64,
    pub enrolled_at: Timestamp,
    pub updated_at: Timestamp,
}
