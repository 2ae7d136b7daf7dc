// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Ephemeral in-memory todo storage.
//!
//! Append-only list guarded by a single lock. Ids are handed out
//! sequentially starting at 1 and are never reused.

use std::sync::{Arc, PoisonError, RwLock};

use crate::model::Todo;

#[derive(Debug)]
struct Inner {
    next_id: i64,
    items: Vec<Todo>,
}

#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                items: Vec::new(),
            })),
        }
    }

    /// Append a new record and return a copy of it.
    pub fn create(&self, title: String, done: bool, created_at: i64) -> Todo {
        let mut lock = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let item = Todo {
            id: lock.next_id,
            title,
            done,
            created_at,
            payload: String::new(),
        };
        lock.next_id += 1;
        lock.items.push(item.clone());
        item
    }

    pub fn get(&self, id: i64) -> Option<Todo> {
        let lock = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        lock.items.iter().find(|item| item.id == id).cloned()
    }

    /// Copy out a page of records. `limit == 0` returns everything from
    /// `offset` on; an offset past the end returns an empty page.
    pub fn list(&self, limit: usize, offset: usize) -> Vec<Todo> {
        let lock = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if offset >= lock.items.len() {
            return Vec::new();
        }

        let end = if limit > 0 {
            offset.saturating_add(limit).min(lock.items.len())
        } else {
            lock.items.len()
        };
        lock.items[offset..end].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> Store {
        let store = Store::new();
        for i in 0..count {
            store.create(format!("item-{}", i), false, 0);
        }
        store
    }

    #[test]
    fn test_sequential_ids() {
        let store = Store::new();
        assert_eq!(store.create("a".into(), false, 0).id, 1);
        assert_eq!(store.create("b".into(), true, 0).id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_unknown() {
        let store = seeded(2);
        assert!(store.get(3).is_none());
        assert_eq!(store.get(2).unwrap().title, "item-1");
    }

    #[test]
    fn test_list_pagination() {
        let store = seeded(5);
        assert_eq!(store.list(0, 0).len(), 5);
        assert_eq!(store.list(2, 0).len(), 2);
        let page = store.list(2, 4);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 5);
        assert!(store.list(10, 5).is_empty());
        assert!(store.list(10, 100).is_empty());
    }

    #[test]
    fn test_list_empty_store() {
        let store = Store::new();
        assert!(store.is_empty());
        assert!(store.list(10, 0).is_empty());
    }

    #[test]
    fn test_concurrent_create() {
        use std::collections::HashSet;
        use std::thread;

        let store = Store::new();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || store.create(format!("t-{}", i), false, 0).id)
            })
            .collect();

        let ids: HashSet<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids.iter().max(), Some(&10));
    }
}
