use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_enrollment, CurrentUser};
use crate::api::messages;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::repositories;
use crate::schemas::assignment::{
    AssignmentCreate, AssignmentEnvelope, AssignmentResponse, AssignmentUpdate, SubmissionCreate,
    SubmissionEnvelope, SubmissionListEnvelope, SubmissionOverviewEntry, SubmissionResponse,
};
use crate::schemas::MessageResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:assignment_id", put(update_assignment).delete(delete_assignment))
        .route("/:assignment_id/submissions", get(list_submissions).post(submit_assignment))
}

/// Routed from the lessons router: POST /lessons/:lesson_id/assignments.
pub(in crate::api) async fn create_assignment(
    Path(lesson_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentEnvelope>), ApiError> {
    validation::check(&payload)?;

    let lesson = repositories::lessons::find_context(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?;

    let Some(lesson) = lesson else {
        return Err(ApiError::NotFound(messages::LESSON_NOT_FOUND));
    };

    if lesson.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::ASSIGNMENT_CREATE_FORBIDDEN));
    }

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let assignment = repositories::assignments::create(
        &mut *tx,
        repositories::assignments::CreateAssignment {
            id: &Uuid::new_v4().to_string(),
            lesson_id: &lesson.id,
            title: &payload.title,
            description: &payload.description,
            instructions: &payload.instructions,
            deadline: payload.deadline.map(to_primitive_utc),
            max_score: payload.max_score,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    repositories::lessons::set_has_assignment(&mut *tx, &lesson.id, true, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson assignment flag"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentEnvelope {
            message: messages::ASSIGNMENT_CREATED.to_string(),
            assignment: AssignmentResponse::from_db(assignment),
        }),
    ))
}

async fn update_assignment(
    Path(assignment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentEnvelope>, ApiError> {
    validation::check(&payload)?;

    let assignment = repositories::assignments::find_context(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?;

    let Some(assignment) = assignment else {
        return Err(ApiError::NotFound(messages::ASSIGNMENT_NOT_FOUND));
    };

    if assignment.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::ASSIGNMENT_UPDATE_FORBIDDEN));
    }

    let updated = repositories::assignments::update(
        state.db(),
        &assignment.id,
        repositories::assignments::UpdateAssignment {
            title: payload.title,
            description: payload.description,
            instructions: payload.instructions,
            deadline: payload.deadline.map(to_primitive_utc),
            max_score: payload.max_score,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assignment"))?;

    Ok(Json(AssignmentEnvelope {
        message: messages::ASSIGNMENT_UPDATED.to_string(),
        assignment: AssignmentResponse::from_db(updated),
    }))
}

async fn delete_assignment(
    Path(assignment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let assignment = repositories::assignments::find_context(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?;

    let Some(assignment) = assignment else {
        return Err(ApiError::NotFound(messages::ASSIGNMENT_NOT_FOUND));
    };

    if assignment.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::ASSIGNMENT_DELETE_FORBIDDEN));
    }

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::assignments::delete(&mut *tx, &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;

    let remaining = repositories::assignments::exists_for_lesson(&mut *tx, &assignment.lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check remaining assignments"))?;

    if !remaining {
        repositories::lessons::set_has_assignment(
            &mut *tx,
            &assignment.lesson_id,
            false,
            primitive_now_utc(),
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson assignment flag"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(MessageResponse { message: messages::ASSIGNMENT_DELETED.to_string() }))
}

async fn list_submissions(
    Path(assignment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SubmissionListEnvelope>, ApiError> {
    let assignment = repositories::assignments::find_context(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?;

    let Some(assignment) = assignment else {
        return Err(ApiError::NotFound(messages::ASSIGNMENT_NOT_FOUND));
    };

    if assignment.teacher_id != user.id {
        return Err(ApiError::Forbidden(messages::SUBMISSIONS_VIEW_FORBIDDEN));
    }

    let rows = repositories::assignments::list_submission_overview(
        state.db(),
        &assignment.id,
        &assignment.course_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to fetch submissions"))?;

    Ok(Json(SubmissionListEnvelope {
        message: messages::SUBMISSIONS_OK.to_string(),
        assignment: AssignmentResponse::from_context(assignment),
        submissions: rows.into_iter().map(SubmissionOverviewEntry::from_row).collect(),
    }))
}

async fn submit_assignment(
    Path(assignment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionEnvelope>), ApiError> {
    validation::check(&payload)?;

    let assignment = repositories::assignments::find_context(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?;

    let Some(assignment) = assignment else {
        return Err(ApiError::NotFound(messages::ASSIGNMENT_NOT_FOUND));
    };

    require_enrollment(&state, &assignment.course_id, &user.id).await?;

    let submission = repositories::assignments::create_submission(
        state.db(),
        repositories::assignments::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            assignment_id: &assignment.id,
            student_id: &user.id,
            content: &payload.content,
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record submission"))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionEnvelope {
            message: messages::SUBMISSION_CREATED.to_string(),
            submission: SubmissionResponse::from_db(submission),
        }),
    ))
}
