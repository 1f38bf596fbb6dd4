use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::questions::models::Question;
use crate::shared::validation::validate_category_names;

/// Response DTO for question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponseDto {
    pub id: i64,
    pub question: String,
    pub detail: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponseDto {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            detail: q.detail,
            user_id: q.user_id,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Question together with its categories, returned by create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDetailDto {
    #[serde(flatten)]
    pub question: QuestionResponseDto,
    pub categories: Vec<CategoryResponseDto>,
}

/// Request DTO for creating a question
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateQuestionDto {
    #[validate(length(min = 1, max = 500, message = "Question must be 1-500 characters"))]
    pub question: String,

    #[validate(length(max = 10000, message = "Detail must not exceed 10000 characters"))]
    #[serde(default)]
    pub detail: String,

    /// Category names to tag the question with; duplicates are ignored
    #[validate(custom(function = "validate_category_names"))]
    pub categories: Option<Vec<String>>,
}

/// Request DTO for updating a question
///
/// When `categories` is present the question's categories are reconciled to
/// exactly that set; when absent they are left alone.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateQuestionDto {
    #[validate(length(min = 1, max = 500, message = "Question must be 1-500 characters"))]
    pub question: String,

    #[validate(length(max = 10000, message = "Detail must not exceed 10000 characters"))]
    #[serde(default)]
    pub detail: String,

    #[validate(custom(function = "validate_category_names"))]
    pub categories: Option<Vec<String>>,
}

/// Request DTO for replacing a question's categories by name
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ReconcileCategoriesDto {
    /// Desired category names; an empty list removes every category
    #[validate(custom(function = "validate_category_names"))]
    pub names: Vec<String>,
}

/// Result of a reconciliation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReconcileResultDto {
    /// Categories attached after reconciliation, ordered by name
    pub categories: Vec<CategoryResponseDto>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Requested names that were already attached
    pub unchanged: Vec<String>,
}

/// Deduplicate a client-supplied name list into the set handed to the reconciler
pub fn desired_names<I>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_names_dedupes_but_keeps_case() {
        let names = vec![
            "math".to_string(),
            "Math".to_string(),
            "math".to_string(),
        ];

        let set = desired_names(names);

        assert_eq!(set.len(), 2);
        assert!(set.contains("math"));
        assert!(set.contains("Math"));
    }

    #[test]
    fn test_create_question_rejects_blank_category() {
        let dto = CreateQuestionDto {
            question: "What is a monad?".to_string(),
            detail: String::new(),
            categories: Some(vec!["fp".to_string(), " ".to_string()]),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_question_without_categories_is_valid() {
        let dto = CreateQuestionDto {
            question: "What is a monad?".to_string(),
            detail: "Asking for a friend".to_string(),
            categories: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_question_rejects_empty_text() {
        let dto = CreateQuestionDto {
            question: String::new(),
            detail: String::new(),
            categories: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_detail_dto_flattens_question() {
        let now = Utc::now();
        let dto = QuestionDetailDto {
            question: QuestionResponseDto {
                id: 1,
                question: "Q".to_string(),
                detail: "D".to_string(),
                user_id: None,
                created_at: now,
                updated_at: now,
            },
            categories: vec![],
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["id"], 1);
        assert!(value["categories"].as_array().unwrap().is_empty());
    }
}
