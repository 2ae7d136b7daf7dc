//! Todo service: input validation in front of the store.
//!
//! Shared by the REST and gRPC frontends, which only differ in how they
//! map [`TodoError`] onto their status codes.

use chrono::Utc;

use crate::error::TodoError;
use crate::model::Todo;
use crate::store::Store;

/// Thread-safe todo service. Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct TodoService {
    store: Store,
}

impl TodoService {
    /// Create a service over a fresh, empty store.
    pub fn new() -> Self {
        Self::with_store(Store::new())
    }

    /// Create a service over an existing store.
    pub fn with_store(store: Store) -> Self {
        Self { store }
    }

    /// Create a todo. Blank titles are rejected.
    pub fn create(&self, title: &str, done: bool) -> Result<Todo, TodoError> {
        if title.trim().is_empty() {
            return Err(TodoError::InvalidInput);
        }

        let item = self
            .store
            .create(title.to_string(), done, Utc::now().timestamp());
        tracing::debug!(id = item.id, "Created todo");
        Ok(item)
    }

    /// Fetch a todo by id. Non-positive ids are invalid input, unknown ids
    /// are not found.
    pub fn get(&self, id: i64) -> Result<Todo, TodoError> {
        if id <= 0 {
            return Err(TodoError::InvalidInput);
        }
        self.store.get(id).ok_or(TodoError::NotFound)
    }

    /// List a page of todos. `limit == 0` means no limit.
    pub fn list(&self, limit: i64, offset: i64) -> Result<Vec<Todo>, TodoError> {
        let limit = usize::try_from(limit).map_err(|_| TodoError::InvalidInput)?;
        let offset = usize::try_from(offset).map_err(|_| TodoError::InvalidInput)?;
        Ok(self.store.list(limit, offset))
    }

    /// Number of stored todos.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let svc = TodoService::new();
        let created = svc.create("buy milk", false).unwrap();
        assert_eq!(created.id, 1);

        let fetched = svc.get(1).unwrap();
        assert_eq!(fetched.title, "buy milk");
        assert!(!fetched.done);
        assert!(fetched.payload.is_empty());
        assert!(fetched.created_at > 0);
    }

    #[test]
    fn test_blank_title_rejected() {
        let svc = TodoService::new();
        assert_eq!(svc.create("", false), Err(TodoError::InvalidInput));
        assert_eq!(svc.create("   \t", true), Err(TodoError::InvalidInput));
        assert!(svc.is_empty());
    }

    #[test]
    fn test_get_errors() {
        let svc = TodoService::new();
        assert_eq!(svc.get(0), Err(TodoError::InvalidInput));
        assert_eq!(svc.get(-4), Err(TodoError::InvalidInput));
        assert_eq!(svc.get(1), Err(TodoError::NotFound));
    }

    #[test]
    fn test_list() {
        let svc = TodoService::new();
        assert!(svc.list(10, 0).unwrap().is_empty());

        for title in ["a", "b", "c"] {
            svc.create(title, false).unwrap();
        }
        assert_eq!(svc.list(0, 0).unwrap().len(), 3);
        assert_eq!(svc.list(2, 0).unwrap().len(), 2);
        assert_eq!(svc.list(10, 2).unwrap()[0].title, "c");
        assert!(svc.list(10, 3).unwrap().is_empty());
    }

    #[test]
    fn test_list_negative_rejected() {
        let svc = TodoService::new();
        assert_eq!(svc.list(-1, 0), Err(TodoError::InvalidInput));
        assert_eq!(svc.list(0, -1), Err(TodoError::InvalidInput));
    }

    #[test]
    fn test_clones_share_store() {
        let svc = TodoService::new();
        let other = svc.clone();
        svc.create("shared", true).unwrap();
        assert_eq!(other.len(), 1);
    }
}
