use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::answers::{dtos as answers_dtos, handlers as answers_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::questions::{dtos as questions_dtos, handlers as questions_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Questions
        questions_handlers::list_questions,
        questions_handlers::list_sorted_questions,
        questions_handlers::get_first_question,
        questions_handlers::get_question,
        questions_handlers::create_question,
        questions_handlers::update_question,
        questions_handlers::delete_question,
        questions_handlers::get_question_user,
        questions_handlers::list_question_answers,
        // Question categories
        questions_handlers::list_question_categories,
        questions_handlers::reconcile_question_categories,
        questions_handlers::attach_category,
        questions_handlers::detach_category,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::list_category_questions,
        // Users
        users_handlers::list_users,
        users_handlers::search_users,
        users_handlers::get_user,
        users_handlers::create_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        users_handlers::list_user_questions,
        users_handlers::list_user_answers,
        // Answers
        answers_handlers::list_answers,
        answers_handlers::get_answer,
        answers_handlers::get_answer_question,
        answers_handlers::get_answer_user,
        answers_handlers::create_answer,
        answers_handlers::update_answer,
        answers_handlers::delete_answer,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Questions
            questions_dtos::QuestionResponseDto,
            questions_dtos::QuestionDetailDto,
            questions_dtos::CreateQuestionDto,
            questions_dtos::UpdateQuestionDto,
            questions_dtos::ReconcileCategoriesDto,
            questions_dtos::ReconcileResultDto,
            ApiResponse<questions_dtos::QuestionResponseDto>,
            ApiResponse<Vec<questions_dtos::QuestionResponseDto>>,
            ApiResponse<questions_dtos::QuestionDetailDto>,
            ApiResponse<questions_dtos::ReconcileResultDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Users
            users_dtos::UserResponseDto,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Answers
            answers_dtos::AnswerResponseDto,
            answers_dtos::CreateAnswerDto,
            ApiResponse<answers_dtos::AnswerResponseDto>,
            ApiResponse<Vec<answers_dtos::AnswerResponseDto>>,
        )
    ),
    tags(
        (name = "questions", description = "Questions and their categories"),
        (name = "categories", description = "Question categories (public)"),
        (name = "users", description = "User records"),
        (name = "answers", description = "Answers to questions"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "DoYouKnow API",
        version = "0.1.0",
        description = "API documentation for DoYouKnow",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
