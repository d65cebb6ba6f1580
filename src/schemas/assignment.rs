use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Assignment, AssignmentSubmission};
use crate::repositories::assignments::{AssignmentContext, SubmissionOverviewRow};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentCreate {
    #[serde(default)]
    #[validate(length(min = 1, message = "ID pelajaran, judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ID pelajaran, judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ID pelajaran, judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) instructions: String,
    #[serde(default, deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) deadline: Option<OffsetDateTime>,
    #[serde(default = "default_max_score")]
    #[serde(alias = "maxScore")]
    pub(crate) max_score: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "Judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Judul, deskripsi, dan instruksi wajib diisi"))]
    pub(crate) instructions: String,
    #[serde(default, deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) deadline: Option<OffsetDateTime>,
    #[serde(default)]
    #[serde(alias = "maxScore")]
    pub(crate) max_score: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmissionCreate {
    #[serde(default)]
    #[validate(length(min = 1, message = "Isi jawaban wajib diisi"))]
    pub(crate) content: String,
}

fn default_max_score() -> i32 {
    100
}

fn parse_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Frontend's datetime-local often sends without timezone.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}:00Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    None
}

fn deserialize_option_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) instructions: String,
    pub(crate) deadline: Option<String>,
    pub(crate) max_score: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            lesson_id: assignment.lesson_id,
            title: assignment.title,
            description: assignment.description,
            instructions: assignment.instructions,
            deadline: assignment.deadline.map(format_primitive),
            max_score: assignment.max_score,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
        }
    }

    pub(crate) fn from_context(assignment: AssignmentContext) -> Self {
        Self {
            id: assignment.id,
            lesson_id: assignment.lesson_id,
            title: assignment.title,
            description: assignment.description,
            instructions: assignment.instructions,
            deadline: assignment.deadline.map(format_primitive),
            max_score: assignment.max_score,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentEnvelope {
    pub(crate) message: String,
    pub(crate) assignment: AssignmentResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) student_id: String,
    pub(crate) content: String,
    pub(crate) submitted_at: String,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: AssignmentSubmission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            content: submission.content,
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionEnvelope {
    pub(crate) message: String,
    pub(crate) submission: SubmissionResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionSummary {
    pub(crate) id: String,
    pub(crate) content: String,
    pub(crate) submitted_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionOverviewEntry {
    pub(crate) student_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) submission: Option<SubmissionSummary>,
}

impl SubmissionOverviewEntry {
    pub(crate) fn from_row(row: SubmissionOverviewRow) -> Self {
        let submission = match (row.submission_id, row.content, row.submitted_at) {
            (Some(id), Some(content), Some(submitted_at)) => Some(SubmissionSummary {
                id,
                content,
                submitted_at: format_primitive(submitted_at),
            }),
            _ => None,
        };

        Self {
            student_id: row.student_id,
            full_name: row.full_name,
            email: row.email,
            submission,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionListEnvelope {
    pub(crate) message: String,
    pub(crate) assignment: AssignmentResponse,
    pub(crate) submissions: Vec<SubmissionOverviewEntry>,
}
