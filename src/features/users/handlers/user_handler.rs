use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::answers::dtos::AnswerResponseDto;
use crate::features::questions::dtos::QuestionResponseDto;
use crate::features::users::dtos::{
    CreateUserDto, SearchUsersQuery, UpdateUserDto, UserResponseDto,
};
use crate::features::users::services::{search_term, UserService};
use crate::shared::types::ApiResponse;

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponseDto>>),
    ),
    tag = "users"
)]
pub async fn list_users(
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.list().await?;
    Ok(Json(ApiResponse::list(users)))
}

/// Search users by exact name or username
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(
        ("term" = String, Query, description = "Exact name or username")
    ),
    responses(
        (status = 200, description = "Matching users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 400, description = "Missing search term")
    ),
    tag = "users"
)]
pub async fn search_users(
    State(service): State<Arc<UserService>>,
    Query(query): Query<SearchUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let term = search_term(query.term)?;
    let users = service.search(&term).await?;
    Ok(Json(ApiResponse::list(users)))
}

/// Get user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user), None, None)),
    ))
}

/// Update a user's name and username
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List questions owned by a user
#[utoipa::path(
    get,
    path = "/api/users/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Questions", body = ApiResponse<Vec<QuestionResponseDto>>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn list_user_questions(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let questions = service.questions_of(id).await?;
    Ok(Json(ApiResponse::list(questions)))
}

/// List answers written by a user
#[utoipa::path(
    get,
    path = "/api/users/{id}/answers",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Answers", body = ApiResponse<Vec<AnswerResponseDto>>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn list_user_answers(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AnswerResponseDto>>>> {
    let answers = service.answers_of(id).await?;
    Ok(Json(ApiResponse::list(answers)))
}
