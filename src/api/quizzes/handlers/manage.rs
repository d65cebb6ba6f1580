use axum::Json;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::messages;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::quiz::{
    AuthoredQuizResponse, QuizDetailEnvelope, QuizDetailResponse, QuizEnvelope, QuizUpdate,
};
use crate::schemas::MessageResponse;

use super::super::helpers;

/// Authoring view: the owning teacher or an admin. Other roles get 403 even
/// though the quiz exists.
pub(in crate::api::quizzes) async fn get_quiz_detail(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<QuizDetailEnvelope>, ApiError> {
    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    if quiz.teacher_id != user.id && !matches!(user.role, UserRole::Admin) {
        return Err(ApiError::Forbidden(messages::QUIZ_VIEW_FORBIDDEN));
    }

    let questions = helpers::load_question_tree(state.db(), &quiz.id).await?;

    Ok(Json(QuizDetailEnvelope {
        message: messages::QUIZ_DETAIL_OK.to_string(),
        quiz: QuizDetailResponse::from_context(quiz, questions),
    }))
}

pub(in crate::api::quizzes) async fn update_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizEnvelope>, ApiError> {
    validation::check(&payload)?;

    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    if quiz.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::QUIZ_UPDATE_FORBIDDEN));
    }

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let updated = repositories::quizzes::update(
        &mut *tx,
        &quiz.id,
        repositories::quizzes::UpdateQuiz {
            title: payload.title,
            description: payload.description,
            passing_percentage: payload.passing_percentage,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    repositories::quizzes::delete_questions(&mut *tx, &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear quiz questions"))?;

    helpers::insert_questions(&mut tx, &quiz.id, &payload.questions).await?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(QuizEnvelope {
        message: messages::QUIZ_UPDATED.to_string(),
        quiz: AuthoredQuizResponse::from_parts(updated, payload.questions),
    }))
}

pub(in crate::api::quizzes) async fn delete_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    if quiz.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::QUIZ_DELETE_FORBIDDEN));
    }

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::quizzes::delete(&mut *tx, &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    let remaining = repositories::quizzes::exists_for_lesson(&mut *tx, &quiz.lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check remaining quizzes"))?;

    if !remaining {
        repositories::lessons::set_has_quiz(&mut *tx, &quiz.lesson_id, false, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update lesson quiz flag"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(MessageResponse { message: messages::QUIZ_DELETED.to_string() }))
}
