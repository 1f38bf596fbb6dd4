use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::User;

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            username: u.username,
            created_at: u.created_at,
        }
    }
}

/// Request DTO for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    /// Identity provider subject; generated when omitted
    pub id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(
        length(min = 3, max = 100, message = "Username must be 3-100 characters"),
        regex(
            path = "*crate::shared::validation::USERNAME_REGEX",
            message = "Username must start with letter or underscore and contain only alphanumeric characters and underscores"
        )
    )]
    pub username: String,
}

/// Request DTO for updating a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(
        length(min = 3, max = 100, message = "Username must be 3-100 characters"),
        regex(
            path = "*crate::shared::validation::USERNAME_REGEX",
            message = "Username must start with letter or underscore and contain only alphanumeric characters and underscores"
        )
    )]
    pub username: String,
}

/// Query params for user search
#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    /// Exact name or username
    pub term: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUserDto {
            id: None,
            name: Name().fake(),
            username: "ada_l".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_username = CreateUserDto {
            id: None,
            name: Name().fake(),
            username: "9lives".to_string(),
        };
        assert!(bad_username.validate().is_err());

        let short_username = CreateUserDto {
            id: None,
            name: Name().fake(),
            username: "ab".to_string(),
        };
        assert!(short_username.validate().is_err());
    }

    #[test]
    fn test_update_user_requires_name() {
        let dto = UpdateUserDto {
            name: String::new(),
            username: "grace".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
