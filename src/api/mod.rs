pub(crate) mod assignments;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod lessons;
pub(crate) mod messages;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod validation;
