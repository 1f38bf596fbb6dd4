use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::try_join_all;

use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryResolver;
use crate::modules::store::{StoreError, StoreResult, TagStore, TagTransaction};

/// Attach/detach work needed to move a question from one name set to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Names in the desired set but not attached, sorted
    pub to_add: Vec<String>,
    /// Names attached but not desired, sorted
    pub to_remove: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff the attached names against the desired ones. Names compare exactly.
pub fn plan(existing: &BTreeSet<String>, desired: &BTreeSet<String>) -> ReconcilePlan {
    ReconcilePlan {
        to_add: desired.difference(existing).cloned().collect(),
        to_remove: existing.difference(desired).cloned().collect(),
    }
}

/// What a reconciliation changed
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
    /// Categories attached once the reconciliation committed, ordered by name
    pub categories: Vec<Category>,
}

fn names_of(categories: &[Category]) -> BTreeSet<String> {
    categories.iter().map(|c| c.name.clone()).collect()
}

/// Brings a question's categories in line with a desired set of names.
///
/// Categories for new names are resolved up front and concurrently. The
/// attach/detach phase then runs in one store transaction with the question
/// row locked, so a failure part way leaves the question's tags untouched.
#[derive(Clone)]
pub struct TagReconciler {
    store: Arc<dyn TagStore>,
    resolver: CategoryResolver,
}

impl TagReconciler {
    pub fn new(store: Arc<dyn TagStore>, resolver: CategoryResolver) -> Self {
        Self { store, resolver }
    }

    pub async fn reconcile(
        &self,
        question_id: i64,
        desired: &BTreeSet<String>,
    ) -> StoreResult<ReconcileOutcome> {
        if !self.store.question_exists(question_id).await? {
            return Err(question_not_found(question_id));
        }

        let existing = names_of(&self.store.categories_of(question_id).await?);
        let initial = plan(&existing, desired);

        let resolved: HashMap<String, Category> = try_join_all(
            initial
                .to_add
                .iter()
                .map(|name| self.resolver.resolve_or_create_with_retry(name)),
        )
        .await?
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();

        let mut tx = self.store.begin().await?;
        if !tx.lock_question(question_id).await? {
            return Err(question_not_found(question_id));
        }

        // Re-plan against what the transaction sees; another writer may have
        // changed the tags since the first read.
        let current = tx.categories_of(question_id).await?;
        let current_names = names_of(&current);
        let plan = plan(&current_names, desired);

        for name in &plan.to_add {
            let category = match resolved.get(name) {
                Some(category) => category.clone(),
                None => resolve_in_tx(tx.as_mut(), name).await?,
            };
            tx.attach(question_id, category.id).await?;
        }

        for name in &plan.to_remove {
            if let Some(category) = current.iter().find(|c| &c.name == name) {
                tx.detach(question_id, category.id).await?;
            }
        }

        let categories = tx.categories_of(question_id).await?;
        tx.commit().await?;

        if !plan.is_empty() {
            tracing::info!(
                "Reconciled categories of question {}: +{:?} -{:?}",
                question_id,
                plan.to_add,
                plan.to_remove
            );
        }

        Ok(ReconcileOutcome {
            unchanged: current_names.intersection(desired).cloned().collect(),
            added: plan.to_add,
            removed: plan.to_remove,
            categories,
        })
    }
}

fn question_not_found(question_id: i64) -> StoreError {
    StoreError::NotFound(format!("Question {} not found", question_id))
}

async fn resolve_in_tx(tx: &mut dyn TagTransaction, name: &str) -> StoreResult<Category> {
    if let Some(category) = tx.find_category_by_name(name).await? {
        return Ok(category);
    }
    if let Some(category) = tx.insert_category(name).await? {
        return Ok(category);
    }
    tx.find_category_by_name(name)
        .await?
        .ok_or_else(|| StoreError::Conflict(format!("Category '{}' changed concurrently", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::memory::{FailingOp, MemoryTagStore};
    use tokio_test::{assert_err, assert_ok};

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn reconciler(store: &MemoryTagStore) -> TagReconciler {
        let store: Arc<dyn TagStore> = Arc::new(store.clone());
        TagReconciler::new(Arc::clone(&store), CategoryResolver::new(store))
    }

    async fn attached(store: &MemoryTagStore, question_id: i64) -> BTreeSet<String> {
        names_of(&store.categories_of(question_id).await.unwrap())
    }

    #[test]
    fn test_plan_diffs_both_ways() {
        let plan = plan(&set(&["math", "science"]), &set(&["science", "art"]));

        assert_eq!(plan.to_add, vec!["art"]);
        assert_eq!(plan.to_remove, vec!["math"]);
    }

    #[test]
    fn test_plan_is_case_sensitive() {
        let plan = plan(&set(&["math"]), &set(&["Math"]));

        assert_eq!(plan.to_add, vec!["Math"]);
        assert_eq!(plan.to_remove, vec!["math"]);
    }

    #[test]
    fn test_plan_for_equal_sets_is_empty() {
        assert!(plan(&set(&["a", "b"]), &set(&["b", "a"])).is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_round_trip() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why is the sky blue?", "").await;
        let reconciler = reconciler(&store);

        let outcome = assert_ok!(
            reconciler
                .reconcile(question.id, &set(&["math", "science"]))
                .await
        );

        assert_eq!(outcome.added, vec!["math", "science"]);
        assert_eq!(names_of(&outcome.categories), set(&["math", "science"]));
        assert_eq!(attached(&store, question.id).await, set(&["math", "science"]));
    }

    #[tokio::test]
    async fn test_reconcile_incremental_update() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why is the sky blue?", "").await;
        let reconciler = reconciler(&store);
        reconciler
            .reconcile(question.id, &set(&["math", "science"]))
            .await
            .unwrap();

        let outcome = assert_ok!(
            reconciler
                .reconcile(question.id, &set(&["science", "art"]))
                .await
        );

        assert_eq!(outcome.added, vec!["art"]);
        assert_eq!(outcome.removed, vec!["math"]);
        assert_eq!(outcome.unchanged, vec!["science"]);
        assert_eq!(attached(&store, question.id).await, set(&["science", "art"]));
        // "math" is only detached, never deleted
        assert_eq!(store.category_count().await, 3);
    }

    #[tokio::test]
    async fn test_reconcile_reuses_existing_category() {
        let store = MemoryTagStore::new();
        let first = store.insert_question("First?", "").await;
        let second = store.insert_question("Second?", "").await;
        let reconciler = reconciler(&store);

        reconciler.reconcile(first.id, &set(&["rust"])).await.unwrap();
        reconciler.reconcile(second.id, &set(&["rust"])).await.unwrap();

        assert_eq!(store.category_count().await, 1);
        assert_eq!(store.pivot_count().await, 2);
    }

    #[tokio::test]
    async fn test_reconcile_empty_set_clears_all() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        let reconciler = reconciler(&store);
        reconciler
            .reconcile(question.id, &set(&["a", "b", "c"]))
            .await
            .unwrap();

        let outcome = assert_ok!(reconciler.reconcile(question.id, &BTreeSet::new()).await);

        assert_eq!(outcome.removed, vec!["a", "b", "c"]);
        assert!(outcome.categories.is_empty());
        assert_eq!(store.pivot_count().await, 0);
    }

    #[tokio::test]
    async fn test_reconcile_same_set_changes_nothing() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        let reconciler = reconciler(&store);
        reconciler.reconcile(question.id, &set(&["a"])).await.unwrap();

        let outcome = assert_ok!(reconciler.reconcile(question.id, &set(&["a"])).await);

        assert!(outcome.added.is_empty());
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.unchanged, vec!["a"]);
        assert_eq!(store.pivot_count().await, 1);
    }

    #[tokio::test]
    async fn test_reconcile_unknown_question_is_not_found() {
        let store = MemoryTagStore::new();
        let reconciler = reconciler(&store);

        let err = assert_err!(reconciler.reconcile(404, &set(&["math"])).await);

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.category_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_detach_rolls_back_attaches() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        let reconciler = reconciler(&store);
        reconciler
            .reconcile(question.id, &set(&["math", "science"]))
            .await
            .unwrap();
        store.fail_on(FailingOp::Detach).await;

        let err = assert_err!(reconciler.reconcile(question.id, &set(&["art"])).await);

        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(attached(&store, question.id).await, set(&["math", "science"]));
    }

    #[tokio::test]
    async fn test_failed_attach_surfaces_error() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        store.fail_on(FailingOp::Attach).await;
        let reconciler = reconciler(&store);

        let err = assert_err!(
            reconciler
                .reconcile(question.id, &set(&["math", "science"]))
                .await
        );

        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.pivot_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_resolve_surfaces_error_before_any_attach() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        store.fail_on(FailingOp::InsertCategory).await;
        let reconciler = reconciler(&store);

        let err = assert_err!(reconciler.reconcile(question.id, &set(&["math"])).await);

        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.pivot_count().await, 0);
    }

    #[tokio::test]
    async fn test_deleted_question_drops_its_links() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "").await;
        let reconciler = reconciler(&store);
        reconciler.reconcile(question.id, &set(&["math"])).await.unwrap();

        store.delete_question(question.id).await;

        assert_eq!(store.pivot_count().await, 0);
        let err = assert_err!(reconciler.reconcile(question.id, &set(&["math"])).await);
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
