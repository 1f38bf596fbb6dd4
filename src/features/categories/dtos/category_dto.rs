use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::validation::validate_category_name;

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
        }
    }
}

/// Request DTO for getting or creating a category by name
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    /// Exact category name, case-sensitive and stored as sent
    #[validate(custom(function = "validate_category_name"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_validation() {
        let valid = CreateCategoryDto {
            name: "Rust".to_string(),
        };
        assert!(valid.validate().is_ok());

        let blank = CreateCategoryDto {
            name: "  ".to_string(),
        };
        assert!(blank.validate().is_err());
    }
}
