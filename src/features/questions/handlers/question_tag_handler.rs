use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::questions::dtos::{ReconcileCategoriesDto, ReconcileResultDto};
use crate::features::questions::services::QuestionTagService;
use crate::shared::types::ApiResponse;

/// List categories of a question
#[utoipa::path(
    get,
    path = "/api/questions/{id}/categories",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Attached categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Question not found")
    ),
    tag = "questions"
)]
pub async fn list_question_categories(
    State(service): State<Arc<QuestionTagService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list_categories(id).await?;
    Ok(Json(ApiResponse::list(categories)))
}

/// Replace the categories of a question by name
///
/// Missing categories are created. An empty list removes every category.
#[utoipa::path(
    put,
    path = "/api/questions/{id}/categories",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    request_body = ReconcileCategoriesDto,
    responses(
        (status = 200, description = "Categories reconciled", body = ApiResponse<ReconcileResultDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn reconcile_question_categories(
    State(service): State<Arc<QuestionTagService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ReconcileCategoriesDto>,
) -> Result<Json<ApiResponse<ReconcileResultDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.reconcile(id, dto.names).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Attach a category to a question
#[utoipa::path(
    post,
    path = "/api/questions/{id}/categories/{category_id}",
    params(
        ("id" = i64, Path, description = "Question ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 201, description = "Category attached"),
        (status = 404, description = "Question or category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn attach_category(
    State(service): State<Arc<QuestionTagService>>,
    Path((id, category_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    service.attach(id, category_id).await?;
    Ok(StatusCode::CREATED)
}

/// Detach a category from a question
#[utoipa::path(
    delete,
    path = "/api/questions/{id}/categories/{category_id}",
    params(
        ("id" = i64, Path, description = "Question ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category detached"),
        (status = 404, description = "Question or category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "questions"
)]
pub async fn detach_category(
    State(service): State<Arc<QuestionTagService>>,
    Path((id, category_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    service.detach(id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
