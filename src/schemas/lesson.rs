use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::LessonProgress;
use crate::repositories::lessons::LessonContext;

/// `completed` is stored as sent; omitting it writes false. Quiz grading is
/// the only path that refuses to un-mark a lesson.
#[derive(Debug, Deserialize)]
pub(crate) struct ProgressUpdateRequest {
    #[serde(default)]
    pub(crate) completed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) module_id: String,
    pub(crate) module_title: String,
    pub(crate) course_id: String,
    pub(crate) course_title: String,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) position: i32,
    pub(crate) has_quiz: bool,
    pub(crate) has_assignment: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl LessonResponse {
    pub(crate) fn from_context(lesson: LessonContext) -> Self {
        Self {
            id: lesson.id,
            module_id: lesson.module_id,
            module_title: lesson.module_title,
            course_id: lesson.course_id,
            course_title: lesson.course_title,
            title: lesson.title,
            content: lesson.content,
            position: lesson.position,
            has_quiz: lesson.has_quiz,
            has_assignment: lesson.has_assignment,
            created_at: format_primitive(lesson.created_at),
            updated_at: format_primitive(lesson.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonEnvelope {
    pub(crate) message: String,
    pub(crate) lesson: LessonResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonProgressResponse {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) student_id: String,
    pub(crate) completed: bool,
    pub(crate) last_accessed_at: String,
}

impl LessonProgressResponse {
    pub(crate) fn from_db(progress: LessonProgress) -> Self {
        Self {
            id: progress.id,
            lesson_id: progress.lesson_id,
            student_id: progress.student_id,
            completed: progress.completed,
            last_accessed_at: format_primitive(progress.last_accessed_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressEnvelope {
    pub(crate) message: String,
    pub(crate) progress: LessonProgressResponse,
}
