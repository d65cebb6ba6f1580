use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Quiz, QuizAttempt, QuizOption, QuizQuestion};
use crate::repositories::quizzes::QuizContext;

/// Serialize is intentional: create/update responses echo the submitted
/// questions back as confirmation instead of re-reading them from storage.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QuizOptionPayload {
    #[serde(default)]
    #[serde(alias = "optionText")]
    pub(crate) option_text: String,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QuizQuestionPayload {
    #[serde(default)]
    #[serde(alias = "questionText")]
    pub(crate) question_text: String,
    #[serde(default)]
    #[serde(alias = "questionType")]
    pub(crate) question_type: String,
    #[serde(default)]
    pub(crate) options: Vec<QuizOptionPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[serde(default)]
    #[validate(length(min = 1, message = "ID pelajaran, judul, dan array pertanyaan wajib diisi"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default = "default_passing_percentage")]
    #[serde(alias = "passingPercentage")]
    #[validate(range(min = 0, max = 100, message = "Persentase kelulusan harus antara 0 dan 100"))]
    pub(crate) passing_percentage: i32,
    #[serde(default)]
    #[validate(length(min = 1, message = "ID pelajaran, judul, dan array pertanyaan wajib diisi"))]
    pub(crate) questions: Vec<QuizQuestionPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "Judul dan array pertanyaan wajib diisi"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "passingPercentage")]
    #[validate(range(min = 0, max = 100, message = "Persentase kelulusan harus antara 0 dan 100"))]
    pub(crate) passing_percentage: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Judul dan array pertanyaan wajib diisi"))]
    pub(crate) questions: Vec<QuizQuestionPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QuizAnswerPayload {
    #[serde(default)]
    #[serde(alias = "questionId")]
    pub(crate) question_id: String,
    #[serde(default)]
    #[serde(alias = "selectedOptionIds")]
    pub(crate) selected_option_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizSubmission {
    #[serde(default)]
    #[validate(length(min = 1, message = "Array jawaban wajib diisi"))]
    pub(crate) answers: Vec<QuizAnswerPayload>,
}

fn default_passing_percentage() -> i32 {
    70
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionDetailResponse {
    pub(crate) id: String,
    pub(crate) option_text: String,
    pub(crate) is_correct: bool,
    pub(crate) position: i32,
}

impl OptionDetailResponse {
    pub(crate) fn from_db(option: QuizOption) -> Self {
        Self {
            id: option.id,
            option_text: option.option_text,
            is_correct: option.is_correct,
            position: option.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionDetailResponse {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) question_type: String,
    pub(crate) position: i32,
    pub(crate) options: Vec<OptionDetailResponse>,
}

impl QuestionDetailResponse {
    pub(crate) fn from_parts(question: QuizQuestion, options: Vec<OptionDetailResponse>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_type: question.question_type,
            position: question.position,
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailResponse {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) passing_percentage: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) questions: Vec<QuestionDetailResponse>,
}

impl QuizDetailResponse {
    pub(crate) fn from_context(quiz: QuizContext, questions: Vec<QuestionDetailResponse>) -> Self {
        Self {
            id: quiz.id,
            lesson_id: quiz.lesson_id,
            title: quiz.title,
            description: quiz.description,
            passing_percentage: quiz.passing_percentage,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
            questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailEnvelope {
    pub(crate) message: String,
    pub(crate) quiz: QuizDetailResponse,
}

/// Confirmation shape for create/update: scalar fields from the stored row,
/// questions echoed from the request payload.
#[derive(Debug, Serialize)]
pub(crate) struct AuthoredQuizResponse {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) passing_percentage: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) questions: Vec<QuizQuestionPayload>,
}

impl AuthoredQuizResponse {
    pub(crate) fn from_parts(quiz: Quiz, questions: Vec<QuizQuestionPayload>) -> Self {
        Self {
            id: quiz.id,
            lesson_id: quiz.lesson_id,
            title: quiz.title,
            description: quiz.description,
            passing_percentage: quiz.passing_percentage,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
            questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizEnvelope {
    pub(crate) message: String,
    pub(crate) quiz: AuthoredQuizResponse,
}

/// Delivery projection. `is_correct` must never appear here.
#[derive(Debug, Serialize)]
pub(crate) struct StudentOptionResponse {
    pub(crate) id: String,
    pub(crate) option_text: String,
    pub(crate) position: i32,
}

impl StudentOptionResponse {
    pub(crate) fn from_db(option: QuizOption) -> Self {
        Self { id: option.id, option_text: option.option_text, position: option.position }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentQuestionResponse {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) question_type: String,
    pub(crate) position: i32,
    pub(crate) options: Vec<StudentOptionResponse>,
}

impl StudentQuestionResponse {
    pub(crate) fn from_parts(question: QuizQuestion, options: Vec<StudentOptionResponse>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_type: question.question_type,
            position: question.position,
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentQuizResponse {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) module_id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) passing_percentage: i32,
    pub(crate) has_passed: bool,
    pub(crate) questions: Vec<StudentQuestionResponse>,
}

impl StudentQuizResponse {
    pub(crate) fn from_context(
        quiz: QuizContext,
        has_passed: bool,
        questions: Vec<StudentQuestionResponse>,
    ) -> Self {
        Self {
            id: quiz.id,
            lesson_id: quiz.lesson_id,
            module_id: quiz.module_id,
            course_id: quiz.course_id,
            title: quiz.title,
            description: quiz.description,
            passing_percentage: quiz.passing_percentage,
            has_passed,
            questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentQuizEnvelope {
    pub(crate) message: String,
    pub(crate) quiz: StudentQuizResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerResultResponse {
    pub(crate) question_id: String,
    pub(crate) selected_option_ids: Vec<String>,
    pub(crate) is_correct: bool,
}

/// Never reveals which options were actually correct; students only see the
/// per-question boolean.
#[derive(Debug, Serialize)]
pub(crate) struct GradingResultResponse {
    pub(crate) score_percentage: i32,
    pub(crate) is_passed: bool,
    pub(crate) correct_count: usize,
    pub(crate) total_questions: usize,
    pub(crate) passing_percentage: i32,
    pub(crate) answers: Vec<AnswerResultResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitEnvelope {
    pub(crate) message: String,
    pub(crate) result: GradingResultResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResponse {
    pub(crate) id: String,
    pub(crate) score_percentage: i32,
    pub(crate) is_passed: bool,
    pub(crate) completed_at: String,
}

impl AttemptResponse {
    pub(crate) fn from_db(attempt: QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            score_percentage: attempt.score_percentage,
            is_passed: attempt.is_passed,
            completed_at: format_primitive(attempt.completed_at),
        }
    }
}

/// Post-hoc review of one answered question; unlike delivery this may reveal
/// which options were correct.
#[derive(Debug, Serialize)]
pub(crate) struct ReviewAnswerResponse {
    pub(crate) question_id: String,
    pub(crate) question_text: String,
    pub(crate) selected_option_ids: Vec<String>,
    pub(crate) is_correct: bool,
    pub(crate) options: Vec<OptionDetailResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LatestAttemptResponse {
    pub(crate) id: String,
    pub(crate) score_percentage: i32,
    pub(crate) is_passed: bool,
    pub(crate) completed_at: String,
    pub(crate) answers: Vec<ReviewAnswerResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSummaryResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) passing_percentage: i32,
}

/// `last_attempt_details` is null until the student has at least one attempt.
#[derive(Debug, Serialize)]
pub(crate) struct ResultsEnvelope {
    pub(crate) message: String,
    pub(crate) quiz: QuizSummaryResponse,
    pub(crate) attempts: Vec<AttemptResponse>,
    pub(crate) last_attempt_details: Option<LatestAttemptResponse>,
}
