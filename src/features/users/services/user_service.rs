use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::answers::dtos::AnswerResponseDto;
use crate::features::answers::models::Answer;
use crate::features::questions::dtos::QuestionResponseDto;
use crate::features::questions::models::Question;
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto, UserResponseDto};
use crate::features::users::models::User;

const USER_COLUMNS: &str = "id, name, username, created_at, updated_at";
const USERNAME_TAKEN: &str = "Username is already taken";

/// Require a non-empty search term
pub fn search_term(term: Option<String>) -> Result<String> {
    term.filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'term' is required".to_string()))
}

/// Service for user records
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_exists(&self, id: Uuid) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<UserResponseDto>> {
        let query = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Users whose name or username equals `term` exactly
    pub async fn search(&self, term: &str) -> Result<Vec<UserResponseDto>> {
        let query = format!(
            "SELECT {} FROM users WHERE username = $1 OR name = $1 ORDER BY username",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(term)
            .fetch_all(&self.pool)
            .await?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponseDto> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|u| u.into())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        let query = format!(
            r#"
            INSERT INTO users (id, name, username)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(dto.id.unwrap_or_else(Uuid::now_v7))
            .bind(&dto.name)
            .bind(&dto.username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, USERNAME_TAKEN))?;

        tracing::info!("User {} created ({})", user.id, user.username);
        Ok(user.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> Result<UserResponseDto> {
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, username = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, USERNAME_TAKEN))?
            .map(|u| u.into())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user with everything they own
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("User {} deleted", id);
        Ok(())
    }

    /// Questions owned by a user
    pub async fn questions_of(&self, id: Uuid) -> Result<Vec<QuestionResponseDto>> {
        self.ensure_exists(id).await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, detail, user_id, created_at, updated_at
            FROM questions
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions.into_iter().map(|q| q.into()).collect())
    }

    /// Answers written by a user
    pub async fn answers_of(&self, id: Uuid) -> Result<Vec<AnswerResponseDto>> {
        self.ensure_exists(id).await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, answer, user_id, question_id, created_at, updated_at
            FROM answers
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers.into_iter().map(|a| a.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_required() {
        assert!(matches!(search_term(None), Err(AppError::BadRequest(_))));
        assert!(matches!(
            search_term(Some(String::new())),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(search_term(Some("ada".to_string())).unwrap(), "ada");
    }
}
