use async_trait::async_trait;

use super::error::StoreResult;
use crate::features::categories::models::Category;
use crate::features::questions::models::{Question, QuestionCategory};

/// Record store for questions, categories and their associations.
///
/// Every tagging service reads and writes through this trait. Implementations
/// must enforce unique category names and at most one association per
/// `(question_id, category_id)` pair.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Whether a question with this id exists.
    async fn question_exists(&self, question_id: i64) -> StoreResult<bool>;

    /// Get a category by id.
    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>>;

    /// Get a category by exact (case-sensitive) name.
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;

    /// Insert a category unless the name is already taken.
    ///
    /// Returns `None` when another row already holds the name; the caller
    /// re-selects it.
    async fn insert_category(&self, name: &str) -> StoreResult<Option<Category>>;

    /// All categories ordered by name.
    async fn all_categories(&self) -> StoreResult<Vec<Category>>;

    /// Categories attached to a question, ordered by name.
    async fn categories_of(&self, question_id: i64) -> StoreResult<Vec<Category>>;

    /// Questions tagged with a category, ordered by id.
    async fn questions_of(&self, category_id: i64) -> StoreResult<Vec<Question>>;

    /// Insert the association unless it exists. Returns the new row, or
    /// `None` when the pair was already associated.
    async fn attach(
        &self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>>;

    /// Delete the association. Returns whether a row was removed.
    async fn detach(&self, question_id: i64, category_id: i64) -> StoreResult<bool>;

    /// Start a unit of work. Dropping it without `commit` discards its writes.
    async fn begin(&self) -> StoreResult<Box<dyn TagTransaction>>;
}

/// Transactional view of the store used to apply a reconciliation atomically.
#[async_trait]
pub trait TagTransaction: Send {
    /// Lock the question for the rest of the transaction. Returns `false`
    /// when the question does not exist.
    async fn lock_question(&mut self, question_id: i64) -> StoreResult<bool>;

    async fn categories_of(&mut self, question_id: i64) -> StoreResult<Vec<Category>>;

    async fn find_category_by_name(&mut self, name: &str) -> StoreResult<Option<Category>>;

    async fn insert_category(&mut self, name: &str) -> StoreResult<Option<Category>>;

    async fn attach(
        &mut self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>>;

    async fn detach(&mut self, question_id: i64, category_id: i64) -> StoreResult<bool>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
