use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::questions::handlers;
use crate::features::questions::services::{QuestionService, QuestionTagService};

/// Read-only question routes (public)
pub fn routes(service: Arc<QuestionService>) -> Router {
    Router::new()
        .route("/api/questions", get(handlers::list_questions))
        .route("/api/questions/sorted", get(handlers::list_sorted_questions))
        .route("/api/questions/first", get(handlers::get_first_question))
        .route("/api/questions/{id}", get(handlers::get_question))
        .route("/api/questions/{id}/user", get(handlers::get_question_user))
        .route(
            "/api/questions/{id}/answers",
            get(handlers::list_question_answers),
        )
        .with_state(service)
}

/// Question write routes; the caller layers authentication on top
pub fn write_routes(service: Arc<QuestionService>) -> Router {
    Router::new()
        .route("/api/questions", post(handlers::create_question))
        .route(
            "/api/questions/{id}",
            axum::routing::put(handlers::update_question).delete(handlers::delete_question),
        )
        .with_state(service)
}

/// Read-only category routes of a question (public)
pub fn tag_routes(service: Arc<QuestionTagService>) -> Router {
    Router::new()
        .route(
            "/api/questions/{id}/categories",
            get(handlers::list_question_categories),
        )
        .with_state(service)
}

/// Category write routes of a question; the caller layers authentication on top
pub fn tag_write_routes(service: Arc<QuestionTagService>) -> Router {
    Router::new()
        .route(
            "/api/questions/{id}/categories",
            axum::routing::put(handlers::reconcile_question_categories),
        )
        .route(
            "/api/questions/{id}/categories/{category_id}",
            post(handlers::attach_category).delete(handlers::detach_category),
        )
        .with_state(service)
}
