use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{self, CurrentUser};
use crate::api::messages;
use crate::api::{assignments, quizzes};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::lesson::{
    LessonEnvelope, LessonResponse, LessonProgressResponse, ProgressEnvelope,
    ProgressUpdateRequest,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:lesson_id", get(get_lesson))
        .route("/:lesson_id/progress", post(update_progress))
        .route("/:lesson_id/quizzes", post(quizzes::create_quiz))
        .route("/:lesson_id/assignments", post(assignments::create_assignment))
}

async fn get_lesson(
    Path(lesson_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<LessonEnvelope>, ApiError> {
    let lesson = repositories::lessons::find_context(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?;

    let Some(lesson) = lesson else {
        return Err(ApiError::NotFound(messages::LESSON_NOT_FOUND));
    };

    match user.role {
        UserRole::Admin => {}
        UserRole::Guru => {
            if lesson.teacher_id != user.id {
                return Err(ApiError::Forbidden(messages::LESSON_VIEW_FORBIDDEN));
            }
        }
        UserRole::Siswa => {
            guards::require_enrollment(&state, &lesson.course_id, &user.id).await?;
        }
        UserRole::Orangtua => {
            return Err(ApiError::Forbidden(messages::LESSON_VIEW_FORBIDDEN));
        }
    }

    Ok(Json(LessonEnvelope {
        message: messages::LESSON_OK.to_string(),
        lesson: LessonResponse::from_context(lesson),
    }))
}

async fn update_progress(
    Path(lesson_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProgressUpdateRequest>,
) -> Result<Json<ProgressEnvelope>, ApiError> {
    if !matches!(user.role, UserRole::Siswa) {
        return Err(ApiError::Forbidden(messages::STUDENT_ONLY_PROGRESS));
    }

    let lesson = repositories::lessons::find_context(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?;

    let Some(lesson) = lesson else {
        return Err(ApiError::NotFound(messages::LESSON_NOT_FOUND));
    };

    guards::require_enrollment(&state, &lesson.course_id, &user.id).await?;

    let progress = repositories::lesson_progress::upsert(
        state.db(),
        &Uuid::new_v4().to_string(),
        &lesson.id,
        &user.id,
        payload.completed,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update lesson progress"))?;

    Ok(Json(ProgressEnvelope {
        message: messages::PROGRESS_OK.to_string(),
        progress: LessonProgressResponse::from_db(progress),
    }))
}
