mod handlers;
mod helpers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::state::AppState;

pub(in crate::api) use handlers::create_quiz;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:quiz_id",
            get(handlers::get_quiz_detail)
                .put(handlers::update_quiz)
                .delete(handlers::delete_quiz),
        )
        .route("/:quiz_id/student", get(handlers::get_student_quiz))
        .route("/:quiz_id/submit", post(handlers::submit_quiz))
        .route("/:quiz_id/results", get(handlers::get_student_results))
}

#[cfg(test)]
mod tests;
