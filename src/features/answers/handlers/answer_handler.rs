use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::answers::dtos::{AnswerResponseDto, CreateAnswerDto};
use crate::features::answers::services::AnswerService;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::questions::dtos::QuestionResponseDto;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::ApiResponse;

/// List all answers
#[utoipa::path(
    get,
    path = "/api/answers",
    responses(
        (status = 200, description = "List of answers", body = ApiResponse<Vec<AnswerResponseDto>>),
    ),
    tag = "answers"
)]
pub async fn list_answers(
    State(service): State<Arc<AnswerService>>,
) -> Result<Json<ApiResponse<Vec<AnswerResponseDto>>>> {
    let answers = service.list().await?;
    Ok(Json(ApiResponse::list(answers)))
}

/// Get answer by id
#[utoipa::path(
    get,
    path = "/api/answers/{id}",
    params(
        ("id" = i64, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Answer found", body = ApiResponse<AnswerResponseDto>),
        (status = 404, description = "Answer not found")
    ),
    tag = "answers"
)]
pub async fn get_answer(
    State(service): State<Arc<AnswerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AnswerResponseDto>>> {
    let answer = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(answer), None, None)))
}

/// Get the question an answer belongs to
#[utoipa::path(
    get,
    path = "/api/answers/{id}/question",
    params(
        ("id" = i64, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Answered question", body = ApiResponse<QuestionResponseDto>),
        (status = 404, description = "Answer not found")
    ),
    tag = "answers"
)]
pub async fn get_answer_question(
    State(service): State<Arc<AnswerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let question = service.question_of(id).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Get the author of an answer
#[utoipa::path(
    get,
    path = "/api/answers/{id}/user",
    params(
        ("id" = i64, Path, description = "Answer ID")
    ),
    responses(
        (status = 200, description = "Author", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "Answer not found")
    ),
    tag = "answers"
)]
pub async fn get_answer_user(
    State(service): State<Arc<AnswerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.user_of(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/api/answers",
    request_body = CreateAnswerDto,
    responses(
        (status = 201, description = "Answer created", body = ApiResponse<AnswerResponseDto>),
        (status = 400, description = "Validation error or unknown question"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "answers"
)]
pub async fn create_answer(
    State(service): State<Arc<AnswerService>>,
    user: AuthenticatedUser,
    AppJson(dto): AppJson<CreateAnswerDto>,
) -> Result<(StatusCode, Json<ApiResponse<AnswerResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let answer = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(answer), None, None)),
    ))
}

/// Replace an answer
#[utoipa::path(
    put,
    path = "/api/answers/{id}",
    params(
        ("id" = i64, Path, description = "Answer ID")
    ),
    request_body = CreateAnswerDto,
    responses(
        (status = 200, description = "Answer updated", body = ApiResponse<AnswerResponseDto>),
        (status = 400, description = "Validation error or unknown question"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Answer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "answers"
)]
pub async fn update_answer(
    State(service): State<Arc<AnswerService>>,
    Path(id): Path<i64>,
    user: AuthenticatedUser,
    AppJson(dto): AppJson<CreateAnswerDto>,
) -> Result<Json<ApiResponse<AnswerResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let answer = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(answer), None, None)))
}

/// Delete an answer
#[utoipa::path(
    delete,
    path = "/api/answers/{id}",
    params(
        ("id" = i64, Path, description = "Answer ID")
    ),
    responses(
        (status = 204, description = "Answer deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Answer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "answers"
)]
pub async fn delete_answer(
    State(service): State<Arc<AnswerService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
