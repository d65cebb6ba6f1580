pub(crate) async fn exists(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM enrollments WHERE course_id = $1 AND student_id = $2
         )",
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_one(executor)
    .await
}
