//! Abstract interface for managing named, mutually-exclusive advisory locks.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod resource;

pub use resource::{InvalidResource, MAX_RESOURCE_LEN, Resource};

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for `LockManager` errors
pub trait LockManagerError: Debug + Error + Send + Sync + 'static {}

/// A lock manager over named resources.
///
/// Locks have a single owner, no expiry and no waiters. Anyone may release
/// a held lock. A rejected acquisition returns immediately.
#[async_trait]
pub trait LockManager: Clone + Send + Sync + 'static {
    /// The error type for lock operations.
    type Error: LockManagerError;

    /// Checks whether a resource is currently locked.
    ///
    /// This is a plain read. Deciding to mutate based on its answer is racy;
    /// use `try_acquire` or `release` for transitions.
    async fn is_locked(&self, resource: &Resource) -> Result<bool, Self::Error>;

    /// Attempts to lock a resource without waiting.
    ///
    /// Returns `Ok(true)` if this call took the lock and `Ok(false)` if it
    /// was already held. An error means the lock state was not changed.
    async fn try_acquire(&self, resource: &Resource) -> Result<bool, Self::Error>;

    /// Releases a resource.
    ///
    /// Returns `Ok(true)` if this call removed the lock and `Ok(false)` if
    /// the resource was not locked. An error means the lock state was not
    /// changed.
    async fn release(&self, resource: &Resource) -> Result<bool, Self::Error>;
}
