use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Quiz, QuizOption, QuizQuestion};

const COLUMNS: &str =
    "id, lesson_id, title, description, passing_percentage, created_at, updated_at";

/// Quiz row joined with the lesson's owning course, used for ownership and
/// enrollment checks on every quiz endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuizContext {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) module_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) passing_percentage: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) course_id: String,
    pub(crate) teacher_id: String,
}

pub(crate) async fn find_context(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Option<QuizContext>, sqlx::Error> {
    sqlx::query_as::<_, QuizContext>(
        "SELECT q.id, q.lesson_id, l.module_id, q.title, q.description,
                q.passing_percentage, q.created_at, q.updated_at,
                m.course_id, c.teacher_id
         FROM quizzes q
         JOIN lessons l ON l.id = q.lesson_id
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE q.id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateQuiz<'a> {
    pub id: &'a str,
    pub lesson_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub passing_percentage: i32,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuiz<'_>,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (
            id, lesson_id, title, description, passing_percentage, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.lesson_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.passing_percentage)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct UpdateQuiz {
    pub title: String,
    pub description: Option<String>,
    pub passing_percentage: Option<i32>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
    params: UpdateQuiz,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET
            title = $1,
            description = COALESCE($2, description),
            passing_percentage = COALESCE($3, passing_percentage),
            updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.passing_percentage)
    .bind(params.updated_at)
    .bind(quiz_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(quiz_id).execute(executor).await?;
    Ok(())
}

pub(crate) async fn exists_for_lesson(
    executor: impl sqlx::PgExecutor<'_>,
    lesson_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM quizzes WHERE lesson_id = $1)")
        .bind(lesson_id)
        .fetch_one(executor)
        .await
}

pub(crate) struct CreateQuizQuestion<'a> {
    pub id: &'a str,
    pub quiz_id: &'a str,
    pub question_text: &'a str,
    pub question_type: &'a str,
    pub position: i32,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn insert_question(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuizQuestion<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_questions (
            id, quiz_id, question_text, question_type, position, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.question_text)
    .bind(params.question_type)
    .bind(params.position)
    .bind(params.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) struct CreateQuizOption<'a> {
    pub id: &'a str,
    pub question_id: &'a str,
    pub option_text: &'a str,
    pub is_correct: bool,
    pub position: i32,
}

pub(crate) async fn insert_option(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateQuizOption<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_options (
            id, question_id, option_text, is_correct, position
        ) VALUES ($1,$2,$3,$4,$5)",
    )
    .bind(params.id)
    .bind(params.question_id)
    .bind(params.option_text)
    .bind(params.is_correct)
    .bind(params.position)
    .execute(executor)
    .await?;
    Ok(())
}

/// Options cascade-delete with their questions.
pub(crate) async fn delete_questions(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn list_questions(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(
        "SELECT id, quiz_id, question_text, question_type, position, created_at
         FROM quiz_questions
         WHERE quiz_id = $1
         ORDER BY position",
    )
    .bind(quiz_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn list_options(
    executor: impl sqlx::PgExecutor<'_>,
    question_ids: &[String],
) -> Result<Vec<QuizOption>, sqlx::Error> {
    sqlx::query_as::<_, QuizOption>(
        "SELECT id, question_id, option_text, is_correct, position
         FROM quiz_options
         WHERE question_id = ANY($1)
         ORDER BY position",
    )
    .bind(question_ids)
    .fetch_all(executor)
    .await
}
