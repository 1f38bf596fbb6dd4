use std::sync::Arc;

use crate::features::categories::models::Category;
use crate::modules::store::{StoreError, StoreResult, TagStore};

/// Get-or-create for categories by exact name.
///
/// The insert ignores name conflicts and the lookup is repeated when it
/// loses, so concurrent callers asking for the same name all end up with
/// the single row that won.
#[derive(Clone)]
pub struct CategoryResolver {
    store: Arc<dyn TagStore>,
}

impl CategoryResolver {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// Return the category named `name`, creating it if absent.
    ///
    /// Fails with [`StoreError::Conflict`] only when the row that beat our
    /// insert is gone again by the time we re-select it.
    pub async fn resolve_or_create(&self, name: &str) -> StoreResult<Category> {
        self.resolve_or_create_tracked(name)
            .await
            .map(|(category, _)| category)
    }

    /// Like [`resolve_or_create`](Self::resolve_or_create), also reporting
    /// whether this call's insert created the row.
    pub async fn resolve_or_create_tracked(&self, name: &str) -> StoreResult<(Category, bool)> {
        if let Some(category) = self.store.find_category_by_name(name).await? {
            return Ok((category, false));
        }

        if let Some(category) = self.store.insert_category(name).await? {
            tracing::debug!("Created category '{}' (id={})", category.name, category.id);
            return Ok((category, true));
        }

        // Lost the race to another writer
        let category = self
            .store
            .find_category_by_name(name)
            .await?
            .ok_or_else(|| StoreError::Conflict(format!("Category '{}' changed concurrently", name)))?;
        Ok((category, false))
    }

    /// [`resolve_or_create`](Self::resolve_or_create), retried once on conflict
    pub async fn resolve_or_create_with_retry(&self, name: &str) -> StoreResult<Category> {
        match self.resolve_or_create(name).await {
            Err(StoreError::Conflict(msg)) => {
                tracing::warn!("Retrying category resolve for '{}': {}", name, msg);
                self.resolve_or_create(name).await
            }
            other => other,
        }
    }

    /// [`resolve_or_create_tracked`](Self::resolve_or_create_tracked), retried once on conflict
    pub async fn resolve_or_create_tracked_with_retry(
        &self,
        name: &str,
    ) -> StoreResult<(Category, bool)> {
        match self.resolve_or_create_tracked(name).await {
            Err(StoreError::Conflict(msg)) => {
                tracing::warn!("Retrying category resolve for '{}': {}", name, msg);
                self.resolve_or_create_tracked(name).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::memory::{FailingOp, MemoryTagStore};
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use tokio_test::{assert_err, assert_ok};

    fn resolver() -> (MemoryTagStore, CategoryResolver) {
        let store = MemoryTagStore::new();
        let resolver = CategoryResolver::new(Arc::new(store.clone()));
        (store, resolver)
    }

    #[tokio::test]
    async fn test_resolve_twice_returns_same_row() {
        let (store, resolver) = resolver();
        let name: String = Word().fake();

        let first = assert_ok!(resolver.resolve_or_create(&name).await);
        let second = assert_ok!(resolver.resolve_or_create(&name).await);

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, name);
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let (store, resolver) = resolver();

        let upper = assert_ok!(resolver.resolve_or_create("Math").await);
        let lower = assert_ok!(resolver.resolve_or_create("math").await);

        assert_ne!(upper.id, lower.id);
        assert_eq!(store.category_count().await, 2);
    }

    #[tokio::test]
    async fn test_lost_insert_reuses_winner() {
        let (store, resolver) = resolver();
        store.contend_on("science").await;

        let category = assert_ok!(resolver.resolve_or_create("science").await);

        assert_eq!(category.name, "science");
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_create_one_row() {
        let (store, resolver) = resolver();

        let results = futures::future::join_all(
            (0..8).map(|_| {
                let resolver = resolver.clone();
                async move { resolver.resolve_or_create("history").await }
            }),
        )
        .await;

        let ids: Vec<i64> = results.into_iter().map(|r| r.unwrap().id).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_vanished_winner_is_a_conflict() {
        let (store, resolver) = resolver();
        store.vanish_on("physics").await;

        let err = assert_err!(resolver.resolve_or_create("physics").await);

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.category_count().await, 0);
    }

    #[tokio::test]
    async fn test_conflict_is_retried_once() {
        let (store, resolver) = resolver();
        store.vanish_on("physics").await;

        let category = assert_ok!(resolver.resolve_or_create_with_retry("physics").await);

        assert_eq!(category.name, "physics");
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_tracked_resolve_reports_the_inserting_call() {
        let (store, resolver) = resolver();

        let (first, created) = assert_ok!(resolver.resolve_or_create_tracked("chemistry").await);
        assert!(created);

        let (second, created) = assert_ok!(resolver.resolve_or_create_tracked("chemistry").await);
        assert!(!created);
        assert_eq!(first.id, second.id);

        store.contend_on("biology").await;
        let (_, created) = assert_ok!(resolver.resolve_or_create_tracked("biology").await);
        assert!(!created);
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let (store, resolver) = resolver();
        store.fail_on(FailingOp::InsertCategory).await;

        let err = assert_err!(resolver.resolve_or_create_with_retry("art").await);
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
