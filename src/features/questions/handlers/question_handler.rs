use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::answers::dtos::AnswerResponseDto;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::questions::dtos::{
    CreateQuestionDto, QuestionDetailDto, QuestionResponseDto, UpdateQuestionDto,
};
use crate::features::questions::services::QuestionService;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::ApiResponse;

/// List all questions
#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "List of questions", body = ApiResponse<Vec<QuestionResponseDto>>),
    ),
    tag = "questions"
)]
pub async fn list_questions(
    State(service): State<Arc<QuestionService>>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let questions = service.list().await?;
    Ok(Json(ApiResponse::list(questions)))
}

/// List all questions ordered by question text
#[utoipa::path(
    get,
    path = "/api/questions/sorted",
    responses(
        (status = 200, description = "Questions sorted by text", body = ApiResponse<Vec<QuestionResponseDto>>),
    ),
    tag = "questions"
)]
pub async fn list_sorted_questions(
    State(service): State<Arc<QuestionService>>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let questions = service.list_sorted().await?;
    Ok(Json(ApiResponse::list(questions)))
}

/// Get the first question
#[utoipa::path(
    get,
    path = "/api/questions/first",
    responses(
        (status = 200, description = "First question", body = ApiResponse<QuestionResponseDto>),
        (status = 404, description = "No questions")
    ),
    tag = "questions"
)]
pub async fn get_first_question(
    State(service): State<Arc<QuestionService>>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let question = service.first().await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Get question by id
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question found", body = ApiResponse<QuestionResponseDto>),
        (status = 404, description = "Question not found")
    ),
    tag = "questions"
)]
pub async fn get_question(
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let question = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Create a question
///
/// Optional `categories` are deduplicated, created when missing and attached.
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = ApiResponse<QuestionDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn create_question(
    State(service): State<Arc<QuestionService>>,
    user: Option<AuthenticatedUser>,
    AppJson(dto): AppJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionDetailDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.create(dto, user.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(question), None, None)),
    ))
}

/// Update a question
///
/// When `categories` is present the question ends up with exactly those
/// categories.
#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    request_body = UpdateQuestionDto,
    responses(
        (status = 200, description = "Question updated", body = ApiResponse<QuestionDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn update_question(
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<i64>,
    user: Option<AuthenticatedUser>,
    AppJson(dto): AppJson<UpdateQuestionDto>,
) -> Result<Json<ApiResponse<QuestionDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.update(id, dto, user.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Delete a question
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn delete_question(
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the owner of a question
#[utoipa::path(
    get,
    path = "/api/questions/{id}/user",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question owner", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "Question or owner not found")
    ),
    tag = "questions"
)]
pub async fn get_question_user(
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.user_of(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// List answers of a question
#[utoipa::path(
    get,
    path = "/api/questions/{id}/answers",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Answers", body = ApiResponse<Vec<AnswerResponseDto>>),
        (status = 404, description = "Question not found")
    ),
    tag = "questions"
)]
pub async fn list_question_answers(
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<AnswerResponseDto>>>> {
    let answers = service.answers_of(id).await?;
    Ok(Json(ApiResponse::list(answers)))
}
