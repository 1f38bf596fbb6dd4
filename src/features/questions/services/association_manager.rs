use std::sync::Arc;

use crate::features::categories::models::Category;
use crate::modules::store::{StoreError, StoreResult, TagStore};

/// Attaches and detaches categories on questions
#[derive(Clone)]
pub struct AssociationManager {
    store: Arc<dyn TagStore>,
}

impl AssociationManager {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// Link a category to a question.
    ///
    /// Returns whether a new link was created; attaching an existing pair is a
    /// no-op.
    pub async fn attach(&self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        if !self.store.question_exists(question_id).await? {
            return Err(StoreError::NotFound(format!(
                "Question {} not found",
                question_id
            )));
        }
        if self.store.find_category(category_id).await?.is_none() {
            return Err(StoreError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        let created = self.store.attach(question_id, category_id).await?.is_some();
        if created {
            tracing::debug!("Attached category {} to question {}", category_id, question_id);
        }
        Ok(created)
    }

    /// Unlink a category from a question; missing links are ignored
    pub async fn detach(&self, question_id: i64, category_id: i64) -> StoreResult<()> {
        if self.store.detach(question_id, category_id).await? {
            tracing::debug!(
                "Detached category {} from question {}",
                category_id,
                question_id
            );
        }
        Ok(())
    }

    /// Categories currently attached to a question, ordered by name
    pub async fn list_categories(&self, question_id: i64) -> StoreResult<Vec<Category>> {
        self.store.categories_of(question_id).await
    }
}
