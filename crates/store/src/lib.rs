//! Abstract interface for the key-value storage backing lock markers.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// Marker trait for `Store` errors
pub trait StoreError: Debug + Error + Send + Sync + 'static {}

/// A key-value store with asynchronous operations.
///
/// No operation here is conditional: a `get` followed by a `put` is two
/// round trips and another writer may interleave between them. Callers
/// needing check-then-set semantics must serialize access themselves.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// The error type for the store.
    type Error: StoreError;

    /// Deletes a key. Deleting a key that does not exist is not an error.
    async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error>;

    /// Retrieves the value stored under a key, if any.
    async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error>;

    /// Stores a value under a key, replacing any previous value.
    async fn put<K: Into<String> + Send>(&self, key: K, bytes: Bytes) -> Result<(), Self::Error>;
}

/// A store that must be narrowed to a scope (e.g. a plugin id) before use.
pub trait Store1: Clone + Send + Sync + 'static {
    /// The error type for the store.
    type Error: StoreError;

    /// The scoped store type.
    type Scoped: Store<Error = Self::Error>;

    /// Add a scope and make the store usable.
    fn scope<S: Into<String> + Send>(&self, scope: S) -> Self::Scoped;
}
