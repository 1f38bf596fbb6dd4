use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Public user routes
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/search", get(handlers::search_users))
        .route("/api/users/{id}", get(handlers::get_user))
        .route("/api/users/{id}/questions", get(handlers::list_user_questions))
        .route("/api/users/{id}/answers", get(handlers::list_user_answers))
        .with_state(service)
}

/// User write routes (require authentication)
pub fn protected_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", post(handlers::create_user))
        .route(
            "/api/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .with_state(service)
}
