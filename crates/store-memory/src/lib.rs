//! In-memory (single process) implementation of key-value storage for tests
//! and ephemeral local runs.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use simplelock_store::{Store, Store1};
use tokio::sync::Mutex;

type Map = Arc<Mutex<HashMap<String, Bytes>>>;

/// In-memory key-value store.
///
/// Clones and scoped stores derived from the same root share one map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    map: Map,
    prefix: Option<String>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: Arc::new(Mutex::new(HashMap::new())),
            prefix: None,
        }
    }

    const fn with_scope(map: Map, prefix: String) -> Self {
        Self {
            map,
            prefix: Some(prefix),
        }
    }

    fn get_key<K: Into<String>>(&self, key: K) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, key.into()),
            None => key.into(),
        }
    }

    /// Number of entries in the underlying map, across all scopes.
    pub async fn len(&self) -> usize {
        self.map.lock().await.len()
    }

    /// Whether the underlying map is empty, across all scopes.
    pub async fn is_empty(&self) -> bool {
        self.map.lock().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Error = Error;

    async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error> {
        self.map.lock().await.remove(&self.get_key(key));
        Ok(())
    }

    async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error> {
        let map = self.map.lock().await;
        Ok(map.get(&self.get_key(key)).cloned())
    }

    async fn put<K: Into<String> + Send>(&self, key: K, bytes: Bytes) -> Result<(), Self::Error> {
        self.map.lock().await.insert(self.get_key(key), bytes);
        Ok(())
    }
}

/// Single-scoped in-memory key-value store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore1 {
    map: Map,
}

impl MemoryStore1 {
    /// Creates a new, empty `MemoryStore1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store1 for MemoryStore1 {
    type Error = Error;
    type Scoped = MemoryStore;

    fn scope<S: Into<String> + Send>(&self, scope: S) -> Self::Scoped {
        MemoryStore::with_scope(Arc::clone(&self.map), scope.into())
    }
}
