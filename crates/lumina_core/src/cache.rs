//! Explicit keyed query cache.
//!
//! # Responsibility
//! - Hold read results keyed by query identity until a mutation invalidates
//!   them.
//!
//! # Invariants
//! - The cache never refreshes itself; callers invalidate after writes.
//! - Prefix invalidation matches on [`QueryKey::path`].

use std::collections::HashMap;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    PageTree,
    Page(String),
    Trash,
    DatabaseRows(String),
    Workspace,
}

impl QueryKey {
    /// Slash-separated path used for prefix invalidation.
    pub fn path(&self) -> String {
        match self {
            Self::PageTree => "pages".to_string(),
            Self::Page(id) => format!("pages/{id}"),
            Self::Trash => "trash".to_string(),
            Self::DatabaseRows(id) => format!("databases/{id}/rows"),
            Self::Workspace => "workspace".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, V>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, loading and storing it on a miss.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: QueryKey,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.entries.get(&key) {
            return Ok(value.clone());
        }
        let value = load()?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Drops one entry. Returns whether it was cached.
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry whose path starts with `prefix`.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.path().starts_with(prefix));
        before - self.entries.len()
    }
}
