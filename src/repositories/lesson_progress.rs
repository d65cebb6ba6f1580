use time::PrimitiveDateTime;

use crate::db::models::LessonProgress;

/// Idempotent per (lesson, student): the first write inserts, later writes
/// refresh the flag and timestamp in place.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    lesson_id: &str,
    student_id: &str,
    completed: bool,
    last_accessed_at: PrimitiveDateTime,
) -> Result<LessonProgress, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(
        "INSERT INTO lesson_progress (id, lesson_id, student_id, completed, last_accessed_at)
         VALUES ($1,$2,$3,$4,$5)
         ON CONFLICT (lesson_id, student_id)
         DO UPDATE SET completed = EXCLUDED.completed,
                       last_accessed_at = EXCLUDED.last_accessed_at
         RETURNING id, lesson_id, student_id, completed, last_accessed_at",
    )
    .bind(id)
    .bind(lesson_id)
    .bind(student_id)
    .bind(completed)
    .bind(last_accessed_at)
    .fetch_one(executor)
    .await
}
