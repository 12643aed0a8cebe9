//! Route definitions for the `/progress` resource.
//!
//! All endpoints require authentication; resets are student-only.

use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET    /               -> list_progress (?course_id, ?chapter_id)
/// GET    /{chapter_id}   -> get_progress
/// DELETE /{chapter_id}   -> reset_progress (student)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(progress::list_progress))
        .route(
            "/{chapter_id}",
            get(progress::get_progress).delete(progress::reset_progress),
        )
}
