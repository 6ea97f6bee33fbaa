//! Lock manager backed by a plain key-value store.
//!
//! The store offers no conditional write, so every lock transition runs
//! its read-then-write under one process-wide guard. This gives mutual
//! exclusion between callers sharing a `StoreLockManager` (or clones of
//! it). Separate processes sharing the same store are NOT excluded from
//! each other and can both acquire the same resource.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use simplelock_locks::{LockManager, Resource};
use simplelock_store::Store;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Prefix of every lock marker key.
pub const LOCK_KEY_PREFIX: &str = "simplelock_locked_";

const MARKER: &[u8] = b"locked";

/// Derives the store key holding the marker for `resource`.
#[must_use]
pub fn lock_key(resource: &Resource) -> String {
    format!("{LOCK_KEY_PREFIX}{resource}")
}

/// Lock manager storing one marker entry per locked resource.
#[derive(Clone)]
pub struct StoreLockManager<S: Store> {
    store: S,
    guard: Arc<Mutex<()>>,
}

impl<S: Store> StoreLockManager<S> {
    /// Creates a new `StoreLockManager` over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            guard: Arc::new(Mutex::new(())),
        }
    }

    async fn marker_exists(&self, key: &str) -> Result<bool, Error<S::Error>> {
        match self.store.get(key).await {
            Ok(value) => Ok(value.is_some()),
            Err(e) => {
                error!(key, error = ?e, "failed to read lock marker");
                Err(Error::Read(e))
            }
        }
    }
}

#[async_trait]
impl<S: Store> LockManager for StoreLockManager<S> {
    type Error = Error<S::Error>;

    #[instrument(skip_all, fields(resource = %resource))]
    async fn is_locked(&self, resource: &Resource) -> Result<bool, Self::Error> {
        self.marker_exists(&lock_key(resource)).await
    }

    #[instrument(skip_all, fields(resource = %resource))]
    async fn try_acquire(&self, resource: &Resource) -> Result<bool, Self::Error> {
        let key = lock_key(resource);
        let _guard = self.guard.lock().await;

        if self.marker_exists(&key).await? {
            debug!("resource already locked");
            return Ok(false);
        }

        if let Err(e) = self.store.put(key, Bytes::from_static(MARKER)).await {
            error!(error = ?e, "failed to write lock marker");
            return Err(Error::Write(e));
        }

        info!("resource locked");
        Ok(true)
    }

    #[instrument(skip_all, fields(resource = %resource))]
    async fn release(&self, resource: &Resource) -> Result<bool, Self::Error> {
        let key = lock_key(resource);
        let _guard = self.guard.lock().await;

        if !self.marker_exists(&key).await? {
            debug!("resource was not locked");
            return Ok(false);
        }

        if let Err(e) = self.store.del(key).await {
            error!(error = ?e, "failed to delete lock marker");
            return Err(Error::Delete(e));
        }

        info!("resource released");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use assert_matches::assert_matches;
    use simplelock_store::StoreError;
    use simplelock_store_memory::MemoryStore;
    use tracing_test::traced_test;

    #[derive(Debug, thiserror::Error)]
    #[error("injected store failure")]
    struct InjectedFailure;

    impl StoreError for InjectedFailure {}

    /// Wraps a memory store, counting mutations and failing on demand.
    #[derive(Clone, Default)]
    struct TestStore {
        inner: MemoryStore,
        puts: Arc<AtomicUsize>,
        dels: Arc<AtomicUsize>,
        fail_reads: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
        fail_deletes: Arc<AtomicBool>,
        read_delay: Option<Duration>,
    }

    impl TestStore {
        fn slow(read_delay: Duration) -> Self {
            Self {
                read_delay: Some(read_delay),
                ..Self::default()
            }
        }

        fn mutations(&self) -> usize {
            self.puts.load(Ordering::SeqCst) + self.dels.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Store for TestStore {
        type Error = InjectedFailure;

        async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(InjectedFailure);
            }
            self.dels.fetch_add(1, Ordering::SeqCst);
            self.inner.del(key).await.map_err(|_| InjectedFailure)
        }

        async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(InjectedFailure);
            }
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.get(key).await.map_err(|_| InjectedFailure)
        }

        async fn put<K: Into<String> + Send>(
            &self,
            key: K,
            bytes: Bytes,
        ) -> Result<(), Self::Error> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(InjectedFailure);
            }
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, bytes).await.map_err(|_| InjectedFailure)
        }
    }

    fn widget() -> Resource {
        Resource::parse("widgetA").unwrap()
    }

    #[tokio::test]
    async fn test_acquire_then_is_locked() {
        let manager = StoreLockManager::new(MemoryStore::new());

        assert!(!manager.is_locked(&widget()).await.unwrap());
        assert!(manager.try_acquire(&widget()).await.unwrap());
        assert!(manager.is_locked(&widget()).await.unwrap());
    }

    #[tokio::test]
    async fn test_marker_uses_prefixed_key() {
        let store = MemoryStore::new();
        let manager = StoreLockManager::new(store.clone());

        manager.try_acquire(&widget()).await.unwrap();

        assert_eq!(lock_key(&widget()), "simplelock_locked_widgetA");
        assert_eq!(
            store.get("simplelock_locked_widgetA").await.unwrap(),
            Some(Bytes::from_static(b"locked"))
        );
        assert_eq!(store.get("widgetA").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_second_acquire_is_rejected_without_writing() {
        let store = TestStore::default();
        let manager = StoreLockManager::new(store.clone());

        assert!(manager.try_acquire(&widget()).await.unwrap());
        assert!(!manager.try_acquire(&widget()).await.unwrap());
        assert_eq!(store.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_after_acquire() {
        let manager = StoreLockManager::new(MemoryStore::new());

        manager.try_acquire(&widget()).await.unwrap();

        assert!(manager.release(&widget()).await.unwrap());
        assert!(!manager.is_locked(&widget()).await.unwrap());

        // Free again, so it can be re-acquired
        assert!(manager.try_acquire(&widget()).await.unwrap());
    }

    #[tokio::test]
    async fn test_double_release_is_a_no_op() {
        let store = TestStore::default();
        let manager = StoreLockManager::new(store.clone());

        manager.try_acquire(&widget()).await.unwrap();
        assert!(manager.release(&widget()).await.unwrap());
        let mutations = store.mutations();

        assert!(!manager.release(&widget()).await.unwrap());
        assert_eq!(store.mutations(), mutations);
    }

    #[tokio::test]
    async fn test_resources_are_independent() {
        let manager = StoreLockManager::new(MemoryStore::new());
        let other = Resource::parse("widgetB").unwrap();

        assert!(manager.try_acquire(&widget()).await.unwrap());
        assert!(manager.try_acquire(&other).await.unwrap());

        manager.release(&widget()).await.unwrap();
        assert!(manager.is_locked(&other).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_acquire_has_exactly_one_winner() {
        // Slow reads widen the window between check and write.
        let manager = StoreLockManager::new(TestStore::slow(Duration::from_millis(2)));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager.try_acquire(&widget()).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_release_has_exactly_one_winner() {
        let store = TestStore::slow(Duration::from_millis(2));
        let manager = StoreLockManager::new(store.clone());
        manager.try_acquire(&widget()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager.release(&widget()).await.unwrap()
            }));
        }

        let mut released = 0;
        for handle in handles {
            if handle.await.unwrap() {
                released += 1;
            }
        }

        assert_eq!(released, 1);
        assert_eq!(store.dels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_write_does_not_acquire() {
        let store = TestStore::default();
        let manager = StoreLockManager::new(store.clone());
        store.fail_writes.store(true, Ordering::SeqCst);

        assert_matches!(manager.try_acquire(&widget()).await, Err(Error::Write(_)));
        assert!(logs_contain("failed to write lock marker"));

        store.fail_writes.store(false, Ordering::SeqCst);
        assert!(!manager.is_locked(&widget()).await.unwrap());

        // The guard was released on the error path
        let acquired = tokio::time::timeout(
            Duration::from_secs(1),
            manager.try_acquire(&widget()),
        )
        .await
        .expect("guard left held after failed write");
        assert!(acquired.unwrap());
    }

    #[tokio::test]
    async fn test_failed_read_does_not_acquire() {
        let store = TestStore::default();
        let manager = StoreLockManager::new(store.clone());
        store.fail_reads.store(true, Ordering::SeqCst);

        assert_matches!(manager.try_acquire(&widget()).await, Err(Error::Read(_)));
        assert_matches!(manager.is_locked(&widget()).await, Err(Error::Read(_)));
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_release() {
        let store = TestStore::default();
        let manager = StoreLockManager::new(store.clone());
        manager.try_acquire(&widget()).await.unwrap();
        store.fail_deletes.store(true, Ordering::SeqCst);

        assert_matches!(manager.release(&widget()).await, Err(Error::Delete(_)));

        store.fail_deletes.store(false, Ordering::SeqCst);
        assert!(manager.is_locked(&widget()).await.unwrap());
        assert!(manager.release(&widget()).await.unwrap());
    }
}
