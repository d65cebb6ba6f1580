pub(crate) mod assignments;
pub(crate) mod enrollments;
pub(crate) mod lesson_progress;
pub(crate) mod lessons;
pub(crate) mod quiz_attempts;
pub(crate) mod quizzes;
pub(crate) mod users;
