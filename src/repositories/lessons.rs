use sqlx::PgPool;
use time::PrimitiveDateTime;

/// Lesson row joined with the course that owns it, so handlers can check
/// teacher ownership and enrollment without extra round trips.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct LessonContext {
    pub(crate) id: String,
    pub(crate) module_id: String,
    pub(crate) module_title: String,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) position: i32,
    pub(crate) has_quiz: bool,
    pub(crate) has_assignment: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) course_id: String,
    pub(crate) course_title: String,
    pub(crate) teacher_id: String,
}

pub(crate) async fn find_context(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Option<LessonContext>, sqlx::Error> {
    sqlx::query_as::<_, LessonContext>(
        "SELECT l.id, l.module_id, m.title AS module_title, l.title, l.content, l.position,
                l.has_quiz, l.has_assignment, l.created_at, l.updated_at,
                m.course_id, c.title AS course_title, c.teacher_id
         FROM lessons l
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE l.id = $1",
    )
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn set_has_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    lesson_id: &str,
    has_quiz: bool,
    updated_at: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE lessons SET has_quiz = $1, updated_at = $2 WHERE id = $3")
        .bind(has_quiz)
        .bind(updated_at)
        .bind(lesson_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn set_has_assignment(
    executor: impl sqlx::PgExecutor<'_>,
    lesson_id: &str,
    has_assignment: bool,
    updated_at: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE lessons SET has_assignment = $1, updated_at = $2 WHERE id = $3")
        .bind(has_assignment)
        .bind(updated_at)
        .bind(lesson_id)
        .execute(executor)
        .await?;
    Ok(())
}
