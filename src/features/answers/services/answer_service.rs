use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::answers::dtos::{AnswerResponseDto, CreateAnswerDto};
use crate::features::answers::models::Answer;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::questions::dtos::QuestionResponseDto;
use crate::features::questions::models::Question;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;

const ANSWER_COLUMNS: &str = "id, answer, user_id, question_id, created_at, updated_at";

/// Service for answers
pub struct AnswerService {
    pool: PgPool,
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find(&self, id: i64) -> Result<Answer> {
        let query = format!("SELECT {} FROM answers WHERE id = $1", ANSWER_COLUMNS);
        sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<AnswerResponseDto>> {
        let query = format!("SELECT {} FROM answers ORDER BY id", ANSWER_COLUMNS);
        let answers = sqlx::query_as::<_, Answer>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list answers: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(answers.into_iter().map(|a| a.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<AnswerResponseDto> {
        Ok(self.find(id).await?.into())
    }

    /// The question an answer belongs to
    pub async fn question_of(&self, id: i64) -> Result<QuestionResponseDto> {
        let answer = self.find(id).await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, detail, user_id, created_at, updated_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(answer.question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(question.into())
    }

    /// The author of an answer
    pub async fn user_of(&self, id: i64) -> Result<UserResponseDto> {
        let answer = self.find(id).await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(answer.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    pub async fn create(
        &self,
        dto: CreateAnswerDto,
        author: &AuthenticatedUser,
    ) -> Result<AnswerResponseDto> {
        let query = format!(
            r#"
            INSERT INTO answers (answer, user_id, question_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ANSWER_COLUMNS
        );
        let answer = sqlx::query_as::<_, Answer>(&query)
            .bind(&dto.answer)
            .bind(author.user_id)
            .bind(dto.question_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Answer already exists"))?;

        tracing::info!(
            "Answer {} posted to question {} by {}",
            answer.id,
            answer.question_id,
            answer.user_id
        );
        Ok(answer.into())
    }

    pub async fn update(
        &self,
        id: i64,
        dto: CreateAnswerDto,
        author: &AuthenticatedUser,
    ) -> Result<AnswerResponseDto> {
        let query = format!(
            r#"
            UPDATE answers
            SET answer = $2, question_id = $3, user_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ANSWER_COLUMNS
        );
        sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .bind(&dto.answer)
            .bind(dto.question_id)
            .bind(author.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Answer already exists"))?
            .map(|a| a.into())
            .ok_or_else(|| AppError::NotFound(format!("Answer {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Answer {} not found", id)));
        }
        Ok(())
    }
}
