pub mod health;
pub mod progress;
pub mod watch;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /watch/chapter/{chapter_id}          list intervals (GET), report span (POST, student)
/// /watch/course/{course_id}/progress   recomputed course progress (GET)
///
/// /progress                            list records (GET, ?course_id / ?chapter_id)
/// /progress/{chapter_id}               single record (GET), reset (DELETE, student)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/watch", watch::router())
        .nest("/progress", progress::router())
}
