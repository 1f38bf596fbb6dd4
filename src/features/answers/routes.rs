use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::answers::handlers;
use crate::features::answers::services::AnswerService;

/// Public answer routes
pub fn routes(service: Arc<AnswerService>) -> Router {
    Router::new()
        .route("/api/answers", get(handlers::list_answers))
        .route("/api/answers/{id}", get(handlers::get_answer))
        .route("/api/answers/{id}/question", get(handlers::get_answer_question))
        .route("/api/answers/{id}/user", get(handlers::get_answer_user))
        .with_state(service)
}

/// Answer write routes (require authentication)
pub fn protected_routes(service: Arc<AnswerService>) -> Router {
    Router::new()
        .route("/api/answers", post(handlers::create_answer))
        .route(
            "/api/answers/{id}",
            put(handlers::update_answer).delete(handlers::delete_answer),
        )
        .with_state(service)
}
