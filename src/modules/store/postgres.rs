use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::error::StoreResult;
use super::traits::{TagStore, TagTransaction};
use crate::features::categories::models::Category;
use crate::features::questions::models::{Question, QuestionCategory};

const CATEGORY_COLUMNS: &str = "id, name, created_at";

/// PostgreSQL-backed [`TagStore`].
///
/// Uniqueness is enforced by `categories_name_unique` and
/// `question_categories_pair_unique`; writes use `ON CONFLICT DO NOTHING` so
/// racing writers never surface a constraint error.
#[derive(Clone)]
pub struct PgTagStore {
    pool: PgPool,
}

impl PgTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PgTagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgTagStore")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

// Queries shared by the pool-backed store and its transactions.

async fn select_category_by_name<'e, E>(executor: E, name: &str) -> StoreResult<Option<Category>>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT {} FROM categories WHERE name = $1", CATEGORY_COLUMNS);
    let category = sqlx::query_as::<_, Category>(&query)
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(category)
}

async fn insert_category_if_absent<'e, E>(executor: E, name: &str) -> StoreResult<Option<Category>>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        INSERT INTO categories (name)
        VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING {}
        "#,
        CATEGORY_COLUMNS
    );
    let category = sqlx::query_as::<_, Category>(&query)
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(category)
}

async fn select_categories_of<'e, E>(executor: E, question_id: i64) -> StoreResult<Vec<Category>>
where
    E: PgExecutor<'e>,
{
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT c.id, c.name, c.created_at
        FROM categories c
        JOIN question_categories qc ON qc.category_id = c.id
        WHERE qc.question_id = $1
        ORDER BY c.name
        "#,
    )
    .bind(question_id)
    .fetch_all(executor)
    .await?;
    Ok(categories)
}

async fn insert_pivot<'e, E>(
    executor: E,
    question_id: i64,
    category_id: i64,
) -> StoreResult<Option<QuestionCategory>>
where
    E: PgExecutor<'e>,
{
    let pivot = sqlx::query_as::<_, QuestionCategory>(
        r#"
        INSERT INTO question_categories (id, question_id, category_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (question_id, category_id) DO NOTHING
        RETURNING id, question_id, category_id, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(question_id)
    .bind(category_id)
    .fetch_optional(executor)
    .await?;
    Ok(pivot)
}

async fn delete_pivot<'e, E>(executor: E, question_id: i64, category_id: i64) -> StoreResult<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "DELETE FROM question_categories WHERE question_id = $1 AND category_id = $2",
    )
    .bind(question_id)
    .bind(category_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl TagStore for PgTagStore {
    async fn question_exists(&self, question_id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)")
            .bind(question_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        select_category_by_name(&self.pool, name).await
    }

    async fn insert_category(&self, name: &str) -> StoreResult<Option<Category>> {
        insert_category_if_absent(&self.pool, name).await
    }

    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let query = format!("SELECT {} FROM categories ORDER BY name", CATEGORY_COLUMNS);
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn categories_of(&self, question_id: i64) -> StoreResult<Vec<Category>> {
        select_categories_of(&self.pool, question_id).await
    }

    async fn questions_of(&self, category_id: i64) -> StoreResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.question, q.detail, q.user_id, q.created_at, q.updated_at
            FROM questions q
            JOIN question_categories qc ON qc.question_id = q.id
            WHERE qc.category_id = $1
            ORDER BY q.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn attach(
        &self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>> {
        insert_pivot(&self.pool, question_id, category_id).await
    }

    async fn detach(&self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        delete_pivot(&self.pool, question_id, category_id).await
    }

    async fn begin(&self) -> StoreResult<Box<dyn TagTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTagTransaction { tx }))
    }
}

/// A PostgreSQL transaction; rolled back on drop unless committed
pub struct PgTagTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TagTransaction for PgTagTransaction {
    async fn lock_question(&mut self, question_id: i64) -> StoreResult<bool> {
        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM questions WHERE id = $1 FOR UPDATE")
                .bind(question_id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(locked.is_some())
    }

    async fn categories_of(&mut self, question_id: i64) -> StoreResult<Vec<Category>> {
        select_categories_of(&mut *self.tx, question_id).await
    }

    async fn find_category_by_name(&mut self, name: &str) -> StoreResult<Option<Category>> {
        select_category_by_name(&mut *self.tx, name).await
    }

    async fn insert_category(&mut self, name: &str) -> StoreResult<Option<Category>> {
        insert_category_if_absent(&mut *self.tx, name).await
    }

    async fn attach(
        &mut self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>> {
        insert_pivot(&mut *self.tx, question_id, category_id).await
    }

    async fn detach(&mut self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        delete_pivot(&mut *self.tx, question_id, category_id).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
