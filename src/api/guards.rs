use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::api::messages;
use crate::core::{security, state::AppState};
use crate::db::models::User;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized(messages::NO_TOKEN))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized(messages::NO_TOKEN))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized(messages::INVALID_TOKEN))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized(messages::INVALID_TOKEN_USER));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized(messages::INVALID_TOKEN_USER));
        }

        Ok(CurrentUser(user))
    }
}

/// Students interact with a course only through an enrollment row; every
/// student-facing endpoint funnels through this check.
pub(crate) async fn require_enrollment(
    state: &AppState,
    course_id: &str,
    student_id: &str,
) -> Result<(), ApiError> {
    let enrolled = repositories::enrollments::exists(state.db(), course_id, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if enrolled {
        Ok(())
    } else {
        Err(ApiError::Forbidden(messages::NOT_ENROLLED))
    }
}
