use std::collections::HashMap;

use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::messages;
use crate::core::time::primitive_now_utc;
use crate::db::models::QuizOption;
use crate::repositories;
use crate::schemas::quiz::{OptionDetailResponse, QuestionDetailResponse, QuizQuestionPayload};

/// Validates and inserts the nested question/option payload for one quiz.
///
/// Validation is positional (messages carry 1-based indexes), so it runs
/// inside the caller's transaction: an invalid entry aborts the whole write.
pub(super) async fn insert_questions(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    quiz_id: &str,
    questions: &[QuizQuestionPayload],
) -> Result<(), ApiError> {
    let now = primitive_now_utc();

    for (i, question) in questions.iter().enumerate() {
        if question.question_text.is_empty() || question.options.is_empty() {
            return Err(ApiError::BadRequest(messages::invalid_question(i + 1)));
        }

        let question_id = Uuid::new_v4().to_string();
        let question_type = if question.question_type.is_empty() {
            "multiple_choice"
        } else {
            question.question_type.as_str()
        };

        repositories::quizzes::insert_question(
            &mut **tx,
            repositories::quizzes::CreateQuizQuestion {
                id: &question_id,
                quiz_id,
                question_text: &question.question_text,
                question_type,
                position: (i + 1) as i32,
                created_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create quiz question"))?;

        for (j, option) in question.options.iter().enumerate() {
            if option.option_text.is_empty() {
                return Err(ApiError::BadRequest(messages::invalid_option(j + 1, i + 1)));
            }

            repositories::quizzes::insert_option(
                &mut **tx,
                repositories::quizzes::CreateQuizOption {
                    id: &Uuid::new_v4().to_string(),
                    question_id: &question_id,
                    option_text: &option.option_text,
                    is_correct: option.is_correct,
                    position: (j + 1) as i32,
                },
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to create quiz option"))?;
        }
    }

    Ok(())
}

/// Options arrive position-ordered from the repository; grouping preserves
/// that order within each question.
pub(super) fn options_by_question(options: Vec<QuizOption>) -> HashMap<String, Vec<QuizOption>> {
    let mut grouped: HashMap<String, Vec<QuizOption>> = HashMap::new();
    for option in options {
        grouped.entry(option.question_id.clone()).or_default().push(option);
    }
    grouped
}

pub(super) async fn load_question_tree(
    pool: &sqlx::PgPool,
    quiz_id: &str,
) -> Result<Vec<QuestionDetailResponse>, ApiError> {
    let questions = repositories::quizzes::list_questions(pool, quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz questions"))?;

    let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
    let options = repositories::quizzes::list_options(pool, &question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz options"))?;

    let mut grouped = options_by_question(options);

    Ok(questions
        .into_iter()
        .map(|question| {
            let options = grouped
                .remove(&question.id)
                .unwrap_or_default()
                .into_iter()
                .map(OptionDetailResponse::from_db)
                .collect();
            QuestionDetailResponse::from_parts(question, options)
        })
        .collect())
}
