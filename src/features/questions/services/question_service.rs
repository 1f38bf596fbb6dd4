use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::answers::dtos::AnswerResponseDto;
use crate::features::answers::models::Answer;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::questions::dtos::{
    question_dto::desired_names, CreateQuestionDto, QuestionDetailDto, QuestionResponseDto,
    UpdateQuestionDto,
};
use crate::features::questions::models::{CreateQuestion, Question};
use crate::features::questions::services::{AssociationManager, TagReconciler};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;

const QUESTION_COLUMNS: &str = "id, question, detail, user_id, created_at, updated_at";

/// Decide the owner recorded on a question write
///
/// With `require_owner` set the caller must be authenticated and becomes the
/// owner. Otherwise an authenticated caller is still recorded, anonymous
/// writes have no owner.
pub fn resolve_owner(require_owner: bool, caller: Option<&AuthenticatedUser>) -> Result<Option<Uuid>> {
    match caller {
        Some(user) => Ok(Some(user.user_id)),
        None if require_owner => Err(AppError::Unauthorized(
            "Authentication required to write questions".to_string(),
        )),
        None => Ok(None),
    }
}

/// Categories of a question after a write.
///
/// A requested list is deduplicated and reconciled; `None` leaves the
/// question's tags as they are.
async fn sync_categories(
    reconciler: &TagReconciler,
    associations: &AssociationManager,
    question_id: i64,
    requested: Option<Vec<String>>,
) -> Result<Vec<CategoryResponseDto>> {
    let categories = match requested {
        Some(names) => {
            reconciler
                .reconcile(question_id, &desired_names(names))
                .await?
                .categories
        }
        None => associations.list_categories(question_id).await?,
    };
    Ok(categories.into_iter().map(|c| c.into()).collect())
}

/// Service for question records
pub struct QuestionService {
    pool: PgPool,
    associations: AssociationManager,
    reconciler: TagReconciler,
    require_owner: bool,
}

impl QuestionService {
    pub fn new(
        pool: PgPool,
        associations: AssociationManager,
        reconciler: TagReconciler,
        require_owner: bool,
    ) -> Self {
        Self {
            pool,
            associations,
            reconciler,
            require_owner,
        }
    }

    async fn list_ordered(&self, order_by: &str) -> Result<Vec<QuestionResponseDto>> {
        let query = format!(
            "SELECT {} FROM questions ORDER BY {}",
            QUESTION_COLUMNS, order_by
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list questions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(questions.into_iter().map(|q| q.into()).collect())
    }

    async fn find(&self, id: i64) -> Result<Question> {
        let query = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))
    }

    /// All questions in creation order
    pub async fn list(&self) -> Result<Vec<QuestionResponseDto>> {
        self.list_ordered("id").await
    }

    /// All questions ordered by their text
    pub async fn list_sorted(&self) -> Result<Vec<QuestionResponseDto>> {
        self.list_ordered("question ASC, id").await
    }

    /// The oldest question
    pub async fn first(&self) -> Result<QuestionResponseDto> {
        let query = format!(
            "SELECT {} FROM questions ORDER BY id LIMIT 1",
            QUESTION_COLUMNS
        );
        sqlx::query_as::<_, Question>(&query)
            .fetch_optional(&self.pool)
            .await?
            .map(|q| q.into())
            .ok_or_else(|| AppError::NotFound("No questions yet".to_string()))
    }

    pub async fn get(&self, id: i64) -> Result<QuestionResponseDto> {
        Ok(self.find(id).await?.into())
    }

    /// Create a question and tag it with the requested categories
    pub async fn create(
        &self,
        dto: CreateQuestionDto,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<QuestionDetailDto> {
        let data = CreateQuestion {
            question: dto.question,
            detail: dto.detail,
            user_id: resolve_owner(self.require_owner, caller)?,
        };

        let query = format!(
            r#"
            INSERT INTO questions (question, detail, user_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(&data.question)
            .bind(&data.detail)
            .bind(data.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Question already exists"))?;

        tracing::info!("Question {} created (owner={:?})", question.id, question.user_id);

        let categories =
            sync_categories(&self.reconciler, &self.associations, question.id, dto.categories)
                .await?;

        Ok(QuestionDetailDto {
            question: question.into(),
            categories,
        })
    }

    /// Update a question's text and, when given, its categories
    pub async fn update(
        &self,
        id: i64,
        dto: UpdateQuestionDto,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<QuestionDetailDto> {
        let owner = resolve_owner(self.require_owner, caller)?;

        let query = format!(
            r#"
            UPDATE questions
            SET question = $2, detail = $3, user_id = COALESCE($4, user_id), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&dto.question)
            .bind(&dto.detail)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Question already exists"))?
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))?;

        let categories =
            sync_categories(&self.reconciler, &self.associations, id, dto.categories).await?;

        Ok(QuestionDetailDto {
            question: question.into(),
            categories,
        })
    }

    /// Delete a question with its answers and category links
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Question {} not found", id)));
        }

        tracing::info!("Question {} deleted", id);
        Ok(())
    }

    /// The user who owns a question
    pub async fn user_of(&self, id: i64) -> Result<UserResponseDto> {
        let question = self.find(id).await?;
        let owner_id = question
            .user_id
            .ok_or_else(|| AppError::NotFound(format!("Question {} has no owner", id)))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", owner_id)))?;

        Ok(user.into())
    }

    /// Answers posted to a question
    pub async fn answers_of(&self, id: i64) -> Result<Vec<AnswerResponseDto>> {
        self.find(id).await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, answer, user_id, question_id, created_at, updated_at
            FROM answers
            WHERE question_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers.into_iter().map(|a| a.into()).collect())
    }
}
