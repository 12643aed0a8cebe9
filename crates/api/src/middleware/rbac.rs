//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement. Use these in route handlers to enforce authorization
//! at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use praxis_core::error::CoreError;
use praxis_core::roles::ROLE_STUDENT;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `student` role. Rejects with 403 Forbidden otherwise.
///
/// Watch reports and resets record a learner's own viewing history, so they
/// only make sense for student accounts; staff browsing a course must not
/// write progress rows.
///
/// ```ignore
/// async fn student_only(RequireStudent(user): RequireStudent) -> AppResult<Json<()>> {
///     // user is guaranteed to be a student here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_STUDENT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Student role required".into(),
            )));
        }
        Ok(RequireStudent(user))
    }
}
