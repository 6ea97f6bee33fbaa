//! Abstract interface for resolving user ids to display names.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for `UserDirectory` errors
pub trait UserDirectoryError: Debug + Error + Send + Sync + 'static {}

/// A user known to the directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Opaque user id.
    pub id: String,

    /// Name shown to other users.
    pub username: String,
}

/// A directory of users.
#[async_trait]
pub trait UserDirectory: Clone + Send + Sync + 'static {
    /// The error type for lookups.
    type Error: UserDirectoryError;

    /// Looks up a user by id. An unknown id is an error.
    async fn get_user(&self, user_id: &str) -> Result<User, Self::Error>;
}
