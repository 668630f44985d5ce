//! In-memory todo repository.
//!
//! # Invariants
//! - Ids come from a monotonic counter and are never reused, even after
//!   deletion.
//! - Clones share one store; each operation takes the lock exactly once.

use crate::model::todo::{NewTodo, TodoId, TodoItem};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryStore {
    last_id: TodoId,
    rows: BTreeMap<TodoId, TodoItem>,
}

/// Process-local todo repository, cheap to clone across request handlers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.rows.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.rows.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryStore>> {
        self.store.read().map_err(|_| RepoError::Poisoned)
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryStore>> {
        self.store.write().map_err(|_| RepoError::Poisoned)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        todo.validate()?;

        let mut store = self.write()?;
        store.last_id += 1;
        let id = store.last_id;
        store.rows.insert(id, todo.clone().into_item(id));
        Ok(id)
    }

    fn insert_all(&self, todos: &[NewTodo]) -> RepoResult<Vec<TodoId>> {
        for todo in todos {
            todo.validate()?;
        }

        let mut store = self.write()?;
        let mut ids = Vec::with_capacity(todos.len());
        for todo in todos {
            store.last_id += 1;
            let id = store.last_id;
            store.rows.insert(id, todo.clone().into_item(id));
            ids.push(id);
        }
        Ok(ids)
    }

    fn count(&self) -> RepoResult<usize> {
        self.len()
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn find_all(&self, predicate: &dyn Fn(&TodoItem) -> bool) -> RepoResult<Vec<TodoItem>> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|todo| predicate(todo))
            .cloned()
            .collect())
    }

    fn update(&self, todo: &TodoItem) -> RepoResult<()> {
        todo.validate()?;

        let mut store = self.write()?;
        let slot = store
            .rows
            .get_mut(&todo.id)
            .ok_or(RepoError::NotFound(todo.id))?;
        // created_at is write-once.
        let created_at = slot.created_at;
        *slot = TodoItem {
            created_at,
            ..todo.clone()
        };
        Ok(())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        self.write()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}
