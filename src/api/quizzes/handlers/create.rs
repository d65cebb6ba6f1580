use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::messages;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::quiz::{AuthoredQuizResponse, QuizCreate, QuizEnvelope};

use super::super::helpers;

pub(in crate::api) async fn create_quiz(
    axum::extract::Path(lesson_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(axum::http::StatusCode, Json<QuizEnvelope>), ApiError> {
    validation::check(&payload)?;

    let lesson = repositories::lessons::find_context(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?;

    let Some(lesson) = lesson else {
        return Err(ApiError::NotFound(messages::LESSON_NOT_FOUND));
    };

    if lesson.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::QUIZ_CREATE_FORBIDDEN));
    }

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let quiz_id = Uuid::new_v4().to_string();
    let quiz = repositories::quizzes::create(
        &mut *tx,
        repositories::quizzes::CreateQuiz {
            id: &quiz_id,
            lesson_id: &lesson.id,
            title: &payload.title,
            description: &payload.description,
            passing_percentage: payload.passing_percentage,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    helpers::insert_questions(&mut tx, &quiz.id, &payload.questions).await?;

    repositories::lessons::set_has_quiz(&mut *tx, &lesson.id, true, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson quiz flag"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(QuizEnvelope {
            message: messages::QUIZ_CREATED.to_string(),
            quiz: AuthoredQuizResponse::from_parts(quiz, payload.questions),
        }),
    ))
}
