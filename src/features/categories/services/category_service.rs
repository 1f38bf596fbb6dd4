use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::services::CategoryResolver;
use crate::features::questions::dtos::QuestionResponseDto;
use crate::modules::store::TagStore;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn TagStore>,
    resolver: CategoryResolver,
}

impl CategoryService {
    pub fn new(store: Arc<dyn TagStore>, resolver: CategoryResolver) -> Self {
        Self { store, resolver }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.store.all_categories().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: i64) -> Result<CategoryResponseDto> {
        self.store
            .find_category(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Get the category with this exact name, creating it if needed.
    ///
    /// Returns the category and whether it was newly created.
    pub async fn create(&self, name: &str) -> Result<(CategoryResponseDto, bool)> {
        let (category, created) = self
            .resolver
            .resolve_or_create_tracked_with_retry(name)
            .await?;

        if created {
            tracing::info!("Category '{}' created (id={})", category.name, category.id);
        }

        Ok((category.into(), created))
    }

    /// Questions tagged with a category
    pub async fn questions_of(&self, id: i64) -> Result<Vec<QuestionResponseDto>> {
        if self.store.find_category(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        let questions = self.store.questions_of(id).await?;
        Ok(questions.into_iter().map(|q| q.into()).collect())
    }
}
