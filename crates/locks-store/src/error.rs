use simplelock_locks::LockManagerError;
use simplelock_store::StoreError;
use thiserror::Error;

/// Errors that can occur when the backing store fails.
///
/// Whatever the variant, the lock state was left as it was before the
/// failed call.
#[derive(Debug, Error)]
pub enum Error<SE: StoreError> {
    /// The marker could not be read.
    #[error("failed to read lock marker")]
    Read(#[source] SE),

    /// The marker could not be written.
    #[error("failed to write lock marker")]
    Write(#[source] SE),

    /// The marker could not be deleted.
    #[error("failed to delete lock marker")]
    Delete(#[source] SE),
}

impl<SE: StoreError> LockManagerError for Error<SE> {}
