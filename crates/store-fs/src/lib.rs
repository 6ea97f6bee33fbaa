//! Implementation of key-value storage using one file per key, for
//! persistent single-instance deployments.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use simplelock_store::{Store, Store1};
use tokio::fs;
use tokio::io::{self, AsyncWriteExt};

/// KV store using files on disk.
///
/// Keys are used as file names unchanged, so on a case-insensitive
/// filesystem keys differing only in case share one file.
#[derive(Clone, Debug)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Creates a new `FsStore` with the specified directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn get_file_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl Store for FsStore {
    type Error = Error;

    async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error> {
        let path = self.get_file_path(&key.into());
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io("error deleting file", e)),
        }
    }

    async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error> {
        let path = self.get_file_path(&key.into());
        match fs::read(path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io("error reading file", e)),
        }
    }

    async fn put<K: Into<String> + Send>(&self, key: K, bytes: Bytes) -> Result<(), Self::Error> {
        let path = self.get_file_path(&key.into());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Io("error creating directory", e))?;
        }
        let mut file = fs::File::create(path)
            .await
            .map_err(|e| Error::Io("error creating file", e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| Error::Io("error writing file", e))?;
        file.sync_all()
            .await
            .map_err(|e| Error::Io("error syncing file", e))?;
        Ok(())
    }
}

/// A single-scoped KV store using the filesystem. Each scope is a
/// sub-directory.
#[derive(Clone, Debug)]
pub struct FsStore1 {
    dir: PathBuf,
}

impl FsStore1 {
    /// Creates a new `FsStore1` with the specified directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Store1 for FsStore1 {
    type Error = Error;
    type Scoped = FsStore;

    fn scope<S: Into<String> + Send>(&self, scope: S) -> Self::Scoped {
        FsStore::new(self.dir.join(scope.into()))
    }
}
