//! Key-value port for persisted layouts.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;

/// Storage port for serialized column layouts.
///
/// Values are opaque text; callers own the serialization. Implementations
/// only need last-write-wins semantics per key.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes the value stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A layout store that lives only as long as the process.
///
/// # Example
///
/// ```
/// use gridsource_lib::layout::MemoryLayoutStore;
///
/// let store = MemoryLayoutStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    store: DashMap<String, String>,
}

impl MemoryLayoutStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key);
        Ok(())
    }
}
