//! Handlers for the `/watch` resource: reported playback spans and the
//! recomputed course progress view.
//!
//! All endpoints require authentication via [`AuthUser`]; writes are
//! restricted to the student role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use praxis_core::error::CoreError;
use praxis_core::interval::Span;
use praxis_core::types::DbId;
use praxis_db::models::progress::{ChapterProgress, WatchInterval};
use praxis_db::repositories::WatchProgressRepo;
use serde::Serialize;

use crate::engine::watch;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStudent;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Payload for a successful interval report.
#[derive(Debug, Serialize)]
pub struct ReportIntervalData {
    /// The chapter progress record after recomputation.
    pub record: ChapterProgress,
    /// The canonical interval set after the merge, ascending by start.
    pub intervals: Vec<WatchInterval>,
}

// ---------------------------------------------------------------------------
// Watch endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/watch/chapter/{chapter_id}
///
/// List the caller's canonical watch intervals for a chapter, ascending by
/// start position. 404 until the first interval has been reported.
pub async fn list_intervals(
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

    let intervals = WatchProgressRepo::intervals_for_record(&state.pool, record.id).await?;

    Ok(Json(DataResponse { data: intervals }))
}

/// POST /api/v1/watch/chapter/{chapter_id}
///
/// Report a watched span for a chapter (student role). Returns 201 with the
/// updated progress record, the canonical interval set, and a message
/// distinguishing a new disjoint interval from one that coalesced with
/// stored history.
pub async fn report_interval(
    RequireStudent(auth): RequireStudent,
    State(state): State<AppState>,
    Path(chapter_id): Path<DbId>,
    Json(span): Json<Span>,
) -> AppResult<impl IntoResponse> {
    let outcome = watch::report_interval(&state.pool, auth.user_id, chapter_id, span).await?;

    let message = if outcome.merged {
        "Interval merged into existing watch history"
    } else {
        "Interval recorded"
    };

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: ReportIntervalData {
                record: outcome.record,
                intervals: outcome.intervals,
            },
            message,
        }),
    ))
}

/// GET /api/v1/watch/course/{course_id}/progress
///
/// The caller's progress across a course, recomputed from stored intervals
/// on every call. Courses the caller never touched report all-zero figures.
pub async fn course_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = watch::fresh_course_progress(&state.pool, auth.user_id, course_id).await?;

    Ok(Json(DataResponse { data: summary }))
}
