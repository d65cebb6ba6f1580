use std::collections::{HashMap, HashSet};

use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_enrollment, CurrentUser};
use crate::api::messages;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::QuizAttemptAnswer;
use crate::repositories;
use crate::schemas::quiz::{
    AnswerResultResponse, AttemptResponse, GradingResultResponse, LatestAttemptResponse,
    OptionDetailResponse, QuizSubmission, QuizSummaryResponse, ResultsEnvelope,
    ReviewAnswerResponse, StudentOptionResponse, StudentQuestionResponse, StudentQuizEnvelope,
    StudentQuizResponse, SubmitEnvelope,
};
use crate::services::grading::{self, SubmittedAnswer};

use super::super::helpers;

pub(in crate::api::quizzes) async fn get_student_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<StudentQuizEnvelope>, ApiError> {
    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    require_enrollment(&state, &quiz.course_id, &user.id).await?;

    let has_passed = repositories::quiz_attempts::has_passed(state.db(), &quiz.id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check pass state"))?;

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz questions"))?;

    let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
    let options = repositories::quizzes::list_options(state.db(), &question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz options"))?;

    let mut grouped = helpers::options_by_question(options);

    let questions = questions
        .into_iter()
        .map(|question| {
            let options = grouped
                .remove(&question.id)
                .unwrap_or_default()
                .into_iter()
                .map(StudentOptionResponse::from_db)
                .collect();
            StudentQuestionResponse::from_parts(question, options)
        })
        .collect();

    Ok(Json(StudentQuizEnvelope {
        message: messages::QUIZ_OK.to_string(),
        quiz: StudentQuizResponse::from_context(quiz, has_passed, questions),
    }))
}

pub(in crate::api::quizzes) async fn submit_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizSubmission>,
) -> Result<Json<SubmitEnvelope>, ApiError> {
    validation::check(&payload)?;

    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    require_enrollment(&state, &quiz.course_id, &user.id).await?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let questions = repositories::quizzes::list_questions(&mut *tx, &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz questions"))?;

    if questions.is_empty() {
        return Err(ApiError::BadRequest(messages::QUIZ_HAS_NO_QUESTIONS.to_string()));
    }

    let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
    let options = repositories::quizzes::list_options(&mut *tx, &question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz options"))?;

    let mut correct_sets: HashMap<String, HashSet<String>> =
        questions.iter().map(|q| (q.id.clone(), HashSet::new())).collect();
    for option in options {
        if option.is_correct {
            if let Some(set) = correct_sets.get_mut(&option.question_id) {
                set.insert(option.id);
            }
        }
    }

    let submitted = payload
        .answers
        .into_iter()
        .map(|a| SubmittedAnswer {
            question_id: a.question_id,
            selected_option_ids: a.selected_option_ids,
        })
        .collect();

    let outcome = grading::grade(&correct_sets, submitted, quiz.passing_percentage);

    if !outcome.skipped_question_ids.is_empty() {
        tracing::warn!(
            quiz_id = %quiz.id,
            student_id = %user.id,
            skipped = ?outcome.skipped_question_ids,
            "Submission referenced questions outside the quiz"
        );
    }

    let now = primitive_now_utc();
    let attempt_id = Uuid::new_v4().to_string();
    repositories::quiz_attempts::create(
        &mut *tx,
        repositories::quiz_attempts::CreateQuizAttempt {
            id: &attempt_id,
            quiz_id: &quiz.id,
            student_id: &user.id,
            score_percentage: outcome.score_percentage,
            is_passed: outcome.is_passed,
            completed_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record attempt"))?;

    for verdict in &outcome.verdicts {
        repositories::quiz_attempts::insert_answer(
            &mut *tx,
            repositories::quiz_attempts::CreateAttemptAnswer {
                id: &Uuid::new_v4().to_string(),
                attempt_id: &attempt_id,
                question_id: &verdict.question_id,
                selected_option_ids: verdict.selected_option_ids.clone(),
                is_correct: verdict.is_correct,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to record attempt answer"))?;
    }

    if outcome.is_passed {
        repositories::lesson_progress::upsert(
            &mut *tx,
            &Uuid::new_v4().to_string(),
            &quiz.lesson_id,
            &user.id,
            true,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson progress"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let message = if outcome.is_passed { messages::QUIZ_PASSED } else { messages::QUIZ_FAILED };
    let answers = outcome
        .verdicts
        .into_iter()
        .map(|v| AnswerResultResponse {
            question_id: v.question_id,
            selected_option_ids: v.selected_option_ids,
            is_correct: v.is_correct,
        })
        .collect();

    Ok(Json(SubmitEnvelope {
        message: message.to_string(),
        result: GradingResultResponse {
            score_percentage: outcome.score_percentage,
            is_passed: outcome.is_passed,
            correct_count: outcome.correct_count,
            total_questions: outcome.total_questions,
            passing_percentage: quiz.passing_percentage,
            answers,
        },
    }))
}

pub(in crate::api::quizzes) async fn get_student_results(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<ResultsEnvelope>, ApiError> {
    let quiz = repositories::quizzes::find_context(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?;

    let Some(quiz) = quiz else {
        return Err(ApiError::NotFound(messages::QUIZ_NOT_FOUND));
    };

    require_enrollment(&state, &quiz.course_id, &user.id).await?;

    let attempts = repositories::quiz_attempts::list_for_student(state.db(), &quiz.id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempts"))?;

    let summary = QuizSummaryResponse {
        id: quiz.id.clone(),
        title: quiz.title.clone(),
        passing_percentage: quiz.passing_percentage,
    };

    let Some(latest) = attempts.first().cloned() else {
        return Ok(Json(ResultsEnvelope {
            message: messages::NO_ATTEMPTS.to_string(),
            quiz: summary,
            attempts: Vec::new(),
            last_attempt_details: None,
        }));
    };

    let answers = repositories::quiz_attempts::list_answers(state.db(), &latest.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt answers"))?;

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz questions"))?;

    let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
    let options = repositories::quizzes::list_options(state.db(), &question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz options"))?;

    let mut grouped = helpers::options_by_question(options);
    let mut answers_by_question: HashMap<String, QuizAttemptAnswer> =
        answers.into_iter().map(|a| (a.question_id.clone(), a)).collect();

    // Walks current questions in position order; answers whose question was
    // removed by a later quiz edit are historical rows and stay hidden.
    let mut review = Vec::new();
    for question in questions {
        let Some(answer) = answers_by_question.remove(&question.id) else {
            continue;
        };
        let options = grouped
            .remove(&question.id)
            .unwrap_or_default()
            .into_iter()
            .map(OptionDetailResponse::from_db)
            .collect();
        review.push(ReviewAnswerResponse {
            question_id: answer.question_id,
            question_text: question.question_text,
            selected_option_ids: answer.selected_option_ids,
            is_correct: answer.is_correct,
            options,
        });
    }

    Ok(Json(ResultsEnvelope {
        message: messages::RESULTS_OK.to_string(),
        quiz: summary,
        attempts: attempts.into_iter().map(AttemptResponse::from_db).collect(),
        last_attempt_details: Some(LatestAttemptResponse {
            id: latest.id,
            score_percentage: latest.score_percentage,
            is_passed: latest.is_passed,
            completed_at: format_primitive(latest.completed_at),
            answers: review,
        }),
    }))
}
