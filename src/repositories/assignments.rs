use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Assignment, AssignmentSubmission};

const COLUMNS: &str = "\
    id, lesson_id, title, description, instructions, deadline, max_score, \
    created_at, updated_at";

/// Assignment row joined with the lesson's owning course, mirroring
/// `quizzes::QuizContext`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct AssignmentContext {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) instructions: String,
    pub(crate) deadline: Option<PrimitiveDateTime>,
    pub(crate) max_score: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) course_id: String,
    pub(crate) teacher_id: String,
}

pub(crate) async fn find_context(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Option<AssignmentContext>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentContext>(
        "SELECT a.id, a.lesson_id, a.title, a.description, a.instructions,
                a.deadline, a.max_score, a.created_at, a.updated_at,
                m.course_id, c.teacher_id
         FROM assignments a
         JOIN lessons l ON l.id = a.lesson_id
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE a.id = $1",
    )
    .bind(assignment_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateAssignment<'a> {
    pub id: &'a str,
    pub lesson_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub instructions: &'a str,
    pub deadline: Option<PrimitiveDateTime>,
    pub max_score: i32,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            id, lesson_id, title, description, instructions, deadline, max_score,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.lesson_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.instructions)
    .bind(params.deadline)
    .bind(params.max_score)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct UpdateAssignment {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub deadline: Option<PrimitiveDateTime>,
    pub max_score: Option<i32>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    assignment_id: &str,
    params: UpdateAssignment,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments SET
            title = $1,
            description = $2,
            instructions = $3,
            deadline = COALESCE($4, deadline),
            max_score = COALESCE($5, max_score),
            updated_at = $6
         WHERE id = $7
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.instructions)
    .bind(params.deadline)
    .bind(params.max_score)
    .bind(params.updated_at)
    .bind(assignment_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    assignment_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM assignments WHERE id = $1")
        .bind(assignment_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn exists_for_lesson(
    executor: impl sqlx::PgExecutor<'_>,
    lesson_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM assignments WHERE lesson_id = $1)")
        .bind(lesson_id)
        .fetch_one(executor)
        .await
}

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub assignment_id: &'a str,
    pub student_id: &'a str,
    pub content: &'a str,
    pub submitted_at: PrimitiveDateTime,
}

pub(crate) async fn create_submission(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<AssignmentSubmission, sqlx::Error> {
    sqlx::query_as::<_, AssignmentSubmission>(
        "INSERT INTO assignment_submissions (
            id, assignment_id, student_id, content, submitted_at
        ) VALUES ($1,$2,$3,$4,$5)
        RETURNING id, assignment_id, student_id, content, submitted_at",
    )
    .bind(params.id)
    .bind(params.assignment_id)
    .bind(params.student_id)
    .bind(params.content)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

/// One row per enrolled student, with that student's newest submission when
/// one exists.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct SubmissionOverviewRow {
    pub(crate) student_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) submission_id: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
}

pub(crate) async fn list_submission_overview(
    pool: &PgPool,
    assignment_id: &str,
    course_id: &str,
) -> Result<Vec<SubmissionOverviewRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionOverviewRow>(
        "SELECT u.id AS student_id, u.full_name, u.email,
                s.id AS submission_id, s.content, s.submitted_at
         FROM enrollments e
         JOIN users u ON u.id = e.student_id
         LEFT JOIN LATERAL (
             SELECT id, content, submitted_at
             FROM assignment_submissions
             WHERE assignment_id = $1 AND student_id = e.student_id
             ORDER BY submitted_at DESC, id DESC
             LIMIT 1
         ) s ON TRUE
         WHERE e.course_id = $2
         ORDER BY u.full_name, u.id",
    )
    .bind(assignment_id)
    .bind(course_id)
    .fetch_all(pool)
    .await
}
