mod create;
mod delivery;
mod manage;

pub(in crate::api) use create::create_quiz;
pub(super) use delivery::{get_student_quiz, get_student_results, submit_quiz};
pub(super) use manage::{delete_quiz, get_quiz_detail, update_quiz};
