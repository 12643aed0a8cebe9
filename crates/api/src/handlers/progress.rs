//! Handlers for the `/progress` resource: chapter progress records.
//!
//! All endpoints require authentication via [`AuthUser`] and operate on the
//! caller's own records only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use praxis_core::error::CoreError;
use praxis_core::types::DbId;
use praxis_db::repositories::WatchProgressRepo;
use serde::Deserialize;

use crate::engine::watch;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /progress`.
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// Restrict results to one course.
    pub course_id: Option<DbId>,
    /// Restrict results to one chapter; takes precedence over `course_id`.
    pub chapter_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Progress record endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/progress
///
/// List the caller's progress records, most recently updated first,
/// optionally filtered by course or chapter.
pub async fn list_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let records = match (params.chapter_id, params.course_id) {
        (Some(chapter_id), _) => {
            WatchProgressRepo::find_for_user_chapter(&state.pool, auth.user_id, chapter_id)
                .await?
                .into_iter()
                .collect()
        }
        (None, Some(course_id)) => {
            WatchProgressRepo::list_for_user_course(&state.pool, auth.user_id, course_id).await?
        }
        (None, None) => WatchProgressRepo::list_for_user(&state.pool, auth.user_id).await?,
    };

    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/progress/{chapter_id}
///
/// The caller's progress record for one chapter. 404 when no interval has
/// ever been reported for it.
pub async fn get_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(chapter_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = WatchProgressRepo::find_for_user_chapter(&state.pool, auth.user_id, chapter_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chapter progress",
            id: chapter_id,
        }))?;

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/progress/{chapter_id}
///
/// Reset the caller's watch history for a chapter (student role). Drops the
/// record with its interval rows and re-aggregates the course figure.
/// 404 when there is nothing to reset.
pub async fn reset_progress(
    RequireStudent(auth): RequireStudent,
    State(state): State<AppState>,
    Path(chapter_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course_id =
        WatchProgressRepo::delete_for_user_chapter(&state.pool, auth.user_id, chapter_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Chapter progress",
                id: chapter_id,
            }))?;

    watch::recompute_course_progress(&state.pool, auth.user_id, course_id).await;

    tracing::info!(user_id = auth.user_id, chapter_id, "Chapter progress reset");

    Ok(StatusCode::NO_CONTENT)
}
