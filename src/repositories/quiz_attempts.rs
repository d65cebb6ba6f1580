use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{QuizAttempt, QuizAttemptAnswer};

const COLUMNS: &str = "id, quiz_id, student_id, score_percentage, is_passed, completed_at";

pub(crate) struct CreateQuizAttempt<'a> {
    pub id: &'a str,
    pub quiz_id: &'a str,
    pub student_id: &'a str,
    pub score_percentage: i32,
    pub is_passed: bool,
    pub completed_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuizAttempt<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_attempts (
            id, quiz_id, student_id, score_percentage, is_passed, completed_at
        ) VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.student_id)
    .bind(params.score_percentage)
    .bind(params.is_passed)
    .bind(params.completed_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) struct CreateAttemptAnswer<'a> {
    pub id: &'a str,
    pub attempt_id: &'a str,
    pub question_id: &'a str,
    pub selected_option_ids: Vec<String>,
    pub is_correct: bool,
}

pub(crate) async fn insert_answer(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAttemptAnswer<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_attempt_answers (
            id, attempt_id, question_id, selected_option_ids, is_correct
        ) VALUES ($1,$2,$3,$4,$5)",
    )
    .bind(params.id)
    .bind(params.attempt_id)
    .bind(params.question_id)
    .bind(params.selected_option_ids)
    .bind(params.is_correct)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn has_passed(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM quiz_attempts
            WHERE quiz_id = $1 AND student_id = $2 AND is_passed = TRUE
         )",
    )
    .bind(quiz_id)
    .bind(student_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    quiz_id: &str,
    student_id: &str,
) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {COLUMNS} FROM quiz_attempts
         WHERE quiz_id = $1 AND student_id = $2
         ORDER BY completed_at DESC, id",
    ))
    .bind(quiz_id)
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_answers(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Vec<QuizAttemptAnswer>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttemptAnswer>(
        "SELECT id, attempt_id, question_id, selected_option_ids, is_correct
         FROM quiz_attempt_answers
         WHERE attempt_id = $1",
    )
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}
