//! In-memory [`TagStore`] used by tests.
//!
//! Mirrors the constraints of the PostgreSQL schema: unique category names,
//! one association per pair, foreign keys on attach, cascade on question
//! delete. Transactions work on a copy of the state and write it back on
//! commit while holding the store lock.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::traits::{TagStore, TagTransaction};
use crate::features::categories::models::Category;
use crate::features::questions::models::{Question, QuestionCategory};

/// Write operations that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailingOp {
    InsertCategory,
    Attach,
    Detach,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    questions: BTreeMap<i64, Question>,
    categories: BTreeMap<i64, Category>,
    pivots: BTreeMap<(i64, i64), QuestionCategory>,
    next_question_id: i64,
    next_category_id: i64,
    failing: HashSet<FailingOp>,
    // Names another writer grabs right before our insert lands
    contended_names: HashSet<String>,
    // Names whose competing row is inserted and deleted again before we re-select
    vanishing_names: HashSet<String>,
}

impl MemoryState {
    fn check(&self, op: FailingOp) -> StoreResult<()> {
        if self.failing.contains(&op) {
            return Err(StoreError::Storage(format!("injected {:?} failure", op)));
        }
        Ok(())
    }

    fn category_by_name(&self, name: &str) -> Option<Category> {
        self.categories.values().find(|c| c.name == name).cloned()
    }

    fn create_category(&mut self, name: &str) -> Category {
        self.next_category_id += 1;
        let category = Category {
            id: self.next_category_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.categories.insert(category.id, category.clone());
        category
    }

    fn insert_category(&mut self, name: &str) -> StoreResult<Option<Category>> {
        self.check(FailingOp::InsertCategory)?;
        if self.contended_names.remove(name) {
            self.create_category(name);
            return Ok(None);
        }
        if self.vanishing_names.remove(name) {
            return Ok(None);
        }
        if self.category_by_name(name).is_some() {
            return Ok(None);
        }
        Ok(Some(self.create_category(name)))
    }

    fn categories_of(&self, question_id: i64) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .pivots
            .keys()
            .filter(|(q, _)| *q == question_id)
            .filter_map(|(_, c)| self.categories.get(c).cloned())
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    fn attach(&mut self, question_id: i64, category_id: i64) -> StoreResult<Option<QuestionCategory>> {
        self.check(FailingOp::Attach)?;
        if !self.questions.contains_key(&question_id) || !self.categories.contains_key(&category_id)
        {
            return Err(StoreError::NotFound(
                "Referenced record does not exist".to_string(),
            ));
        }
        if self.pivots.contains_key(&(question_id, category_id)) {
            return Ok(None);
        }
        let pivot = QuestionCategory {
            id: Uuid::now_v7(),
            question_id,
            category_id,
            created_at: Utc::now(),
        };
        self.pivots.insert((question_id, category_id), pivot.clone());
        Ok(Some(pivot))
    }

    fn detach(&mut self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        self.check(FailingOp::Detach)?;
        Ok(self.pivots.remove(&(question_id, category_id)).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTagStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a question
    pub async fn insert_question(&self, question: &str, detail: &str) -> Question {
        let mut state = self.state.lock().await;
        state.next_question_id += 1;
        let now = Utc::now();
        let question = Question {
            id: state.next_question_id,
            question: question.to_string(),
            detail: detail.to_string(),
            user_id: None,
            created_at: now,
            updated_at: now,
        };
        state.questions.insert(question.id, question.clone());
        question
    }

    /// Delete a question and, like `ON DELETE CASCADE`, its associations
    pub async fn delete_question(&self, question_id: i64) -> bool {
        let mut state = self.state.lock().await;
        state.pivots.retain(|(q, _), _| *q != question_id);
        state.questions.remove(&question_id).is_some()
    }

    pub async fn category_count(&self) -> usize {
        self.state.lock().await.categories.len()
    }

    pub async fn pivot_count(&self) -> usize {
        self.state.lock().await.pivots.len()
    }

    /// Make every subsequent `op` fail with a storage error
    pub async fn fail_on(&self, op: FailingOp) {
        self.state.lock().await.failing.insert(op);
    }

    /// Simulate another writer creating `name` between our lookup and insert
    pub async fn contend_on(&self, name: &str) {
        self.state
            .lock()
            .await
            .contended_names
            .insert(name.to_string());
    }

    /// Make the next insert of `name` lose to a row that is gone before the
    /// follow-up lookup
    pub async fn vanish_on(&self, name: &str) {
        self.state
            .lock()
            .await
            .vanishing_names
            .insert(name.to_string());
    }
}

#[async_trait]
impl TagStore for MemoryTagStore {
    async fn question_exists(&self, question_id: i64) -> StoreResult<bool> {
        Ok(self.state.lock().await.questions.contains_key(&question_id))
    }

    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&category_id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.state.lock().await.category_by_name(name))
    }

    async fn insert_category(&self, name: &str) -> StoreResult<Option<Category>> {
        self.state.lock().await.insert_category(name)
    }

    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn categories_of(&self, question_id: i64) -> StoreResult<Vec<Category>> {
        Ok(self.state.lock().await.categories_of(question_id))
    }

    async fn questions_of(&self, category_id: i64) -> StoreResult<Vec<Question>> {
        let state = self.state.lock().await;
        Ok(state
            .pivots
            .keys()
            .filter(|(_, c)| *c == category_id)
            .filter_map(|(q, _)| state.questions.get(q).cloned())
            .collect())
    }

    async fn attach(
        &self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>> {
        self.state.lock().await.attach(question_id, category_id)
    }

    async fn detach(&self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        self.state.lock().await.detach(question_id, category_id)
    }

    async fn begin(&self) -> StoreResult<Box<dyn TagTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTagTransaction { guard, working }))
    }
}

struct MemoryTagTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl TagTransaction for MemoryTagTransaction {
    async fn lock_question(&mut self, question_id: i64) -> StoreResult<bool> {
        Ok(self.working.questions.contains_key(&question_id))
    }

    async fn categories_of(&mut self, question_id: i64) -> StoreResult<Vec<Category>> {
        Ok(self.working.categories_of(question_id))
    }

    async fn find_category_by_name(&mut self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.working.category_by_name(name))
    }

    async fn insert_category(&mut self, name: &str) -> StoreResult<Option<Category>> {
        self.working.insert_category(name)
    }

    async fn attach(
        &mut self,
        question_id: i64,
        category_id: i64,
    ) -> StoreResult<Option<QuestionCategory>> {
        self.working.attach(question_id, category_id)
    }

    async fn detach(&mut self, question_id: i64, category_id: i64) -> StoreResult<bool> {
        self.working.detach(question_id, category_id)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTagTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_category_names_are_unique() {
        let store = MemoryTagStore::new();
        let first = assert_ok!(store.insert_category("math").await);
        let second = assert_ok!(store.insert_category("math").await);

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn test_attach_requires_both_endpoints() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "Because").await;

        let err = assert_err!(store.attach(question.id, 99).await);
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_is_discarded() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "Because").await;
        let category = store.insert_category("math").await.unwrap().unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.attach(question.id, category.id).await.unwrap().is_some());
        }

        assert_eq!(store.pivot_count().await, 0);
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "Because").await;
        let category = store.insert_category("math").await.unwrap().unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.attach(question.id, category.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.categories_of(question.id).await.unwrap(), vec![category]);
    }

    #[tokio::test]
    async fn test_delete_question_cascades_to_associations() {
        let store = MemoryTagStore::new();
        let question = store.insert_question("Why?", "Because").await;
        let category = store.insert_category("math").await.unwrap().unwrap();
        store.attach(question.id, category.id).await.unwrap();

        assert!(store.delete_question(question.id).await);
        assert_eq!(store.pivot_count().await, 0);
        assert_eq!(store.category_count().await, 1);
    }
}
