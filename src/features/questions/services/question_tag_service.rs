use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::questions::dtos::{question_dto::desired_names, ReconcileResultDto};
use crate::features::questions::services::{AssociationManager, TagReconciler};
use crate::modules::store::TagStore;

/// Category endpoints nested under a question
pub struct QuestionTagService {
    store: Arc<dyn TagStore>,
    associations: AssociationManager,
    reconciler: TagReconciler,
}

impl QuestionTagService {
    pub fn new(
        store: Arc<dyn TagStore>,
        associations: AssociationManager,
        reconciler: TagReconciler,
    ) -> Self {
        Self {
            store,
            associations,
            reconciler,
        }
    }

    async fn ensure_question(&self, question_id: i64) -> Result<()> {
        if !self.store.question_exists(question_id).await? {
            return Err(AppError::NotFound(format!(
                "Question {} not found",
                question_id
            )));
        }
        Ok(())
    }

    /// Categories attached to a question
    pub async fn list_categories(&self, question_id: i64) -> Result<Vec<CategoryResponseDto>> {
        self.ensure_question(question_id).await?;

        let categories = self.associations.list_categories(question_id).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Attach an existing category; returns whether the link is new
    pub async fn attach(&self, question_id: i64, category_id: i64) -> Result<bool> {
        Ok(self.associations.attach(question_id, category_id).await?)
    }

    /// Detach a category. Both records must exist; the link need not.
    pub async fn detach(&self, question_id: i64, category_id: i64) -> Result<()> {
        self.ensure_question(question_id).await?;
        if self.store.find_category(category_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        self.associations.detach(question_id, category_id).await?;
        Ok(())
    }

    /// Replace a question's categories with the named set
    pub async fn reconcile(&self, question_id: i64, names: Vec<String>) -> Result<ReconcileResultDto> {
        let outcome = self
            .reconciler
            .reconcile(question_id, &desired_names(names))
            .await?;

        Ok(ReconcileResultDto {
            categories: outcome.categories.into_iter().map(|c| c.into()).collect(),
            added: outcome.added,
            removed: outcome.removed,
            unchanged: outcome.unchanged,
        })
    }
}
