//! Route definitions for the `/watch` resource.
//!
//! All endpoints require authentication; reporting is student-only.

use axum::routing::get;
use axum::Router;

use crate::handlers::watch;
use crate::state::AppState;

/// Routes mounted at `/watch`.
///
/// ```text
/// GET  /chapter/{chapter_id}         -> list_intervals
/// POST /chapter/{chapter_id}         -> report_interval (student)
/// GET  /course/{course_id}/progress  -> course_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/chapter/{chapter_id}",
            get(watch::list_intervals).post(watch::report_interval),
        )
        .route("/course/{course_id}/progress", get(watch::course_progress))
}
