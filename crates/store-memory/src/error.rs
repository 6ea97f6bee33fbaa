use simplelock_store::StoreError;
use thiserror::Error;

/// Errors that can occur in this crate.
///
/// The in-memory store cannot fail, but the `Store` trait requires an error
/// type.
#[derive(Clone, Debug, Error)]
#[error("memory store error")]
pub struct Error;

impl StoreError for Error {}
