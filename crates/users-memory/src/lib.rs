//! Static in-memory user directory for tests and local runs.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use simplelock_users::{User, UserDirectory, UserDirectoryError};
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No user has the requested id.
    #[error("user not found: {0}")]
    NotFound(String),
}

impl UserDirectoryError for Error {}

/// User directory backed by a fixed id to username map.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserDirectory {
    users: Arc<HashMap<String, String>>,
}

impl MemoryUserDirectory {
    /// Creates a directory from `(id, username)` pairs.
    pub fn new<I, K, V>(users: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            users: Arc::new(
                users
                    .into_iter()
                    .map(|(id, username)| (id.into(), username.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    type Error = Error;

    async fn get_user(&self, user_id: &str) -> Result<User, Self::Error> {
        self.users
            .get(user_id)
            .map(|username| User {
                id: user_id.to_string(),
                username: username.clone(),
            })
            .ok_or_else(|| Error::NotFound(user_id.to_string()))
    }
}
