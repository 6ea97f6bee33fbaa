#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use simplelock_core::model::CommandArgs;
use simplelock_core::{PLUGIN_ID, ServerConfig, SimpleLock, SimpleLockOptions};
use simplelock_locks_store::StoreLockManager;
use simplelock_store::{Store, Store1, StoreError};
use simplelock_store_memory::{MemoryStore, MemoryStore1};
use simplelock_users::{User, UserDirectory, UserDirectoryError};
use simplelock_users_memory::MemoryUserDirectory;
use tower::ServiceExt;
use url::Url;

pub const SITE_URL: &str = "http://chat.example.com";
pub const ALICE: &str = "user-alice";
pub const BOB: &str = "user-bob";
pub const WIDGET_KEY: &str = "simplelock_locked_widgetA";

pub type TestLock = SimpleLock<StoreLockManager<MemoryStore>, MemoryUserDirectory>;

#[derive(Debug, thiserror::Error)]
#[error("store offline")]
pub struct Offline;

impl StoreError for Offline {}
impl UserDirectoryError for Offline {}

/// A store whose every operation fails.
#[derive(Clone)]
pub struct OfflineStore;

#[async_trait]
impl Store for OfflineStore {
    type Error = Offline;

    async fn del<K: Into<String> + Send>(&self, _key: K) -> Result<(), Self::Error> {
        Err(Offline)
    }

    async fn get<K: Into<String> + Send>(&self, _key: K) -> Result<Option<Bytes>, Self::Error> {
        Err(Offline)
    }

    async fn put<K: Into<String> + Send>(&self, _key: K, _bytes: Bytes) -> Result<(), Self::Error> {
        Err(Offline)
    }
}

/// A user directory whose every lookup fails.
#[derive(Clone)]
pub struct OfflineDirectory;

#[async_trait]
impl UserDirectory for OfflineDirectory {
    type Error = Offline;

    async fn get_user(&self, _user_id: &str) -> Result<User, Self::Error> {
        Err(Offline)
    }
}

pub struct Harness {
    pub plugin: TestLock,
    pub store: MemoryStore,
}

pub fn users() -> MemoryUserDirectory {
    MemoryUserDirectory::new([(ALICE, "alice"), (BOB, "bob")])
}

pub fn server_config(site_url: &str) -> ServerConfig {
    ServerConfig::new(Url::parse(site_url).unwrap())
}

pub fn harness() -> Harness {
    let store = MemoryStore1::new().scope(PLUGIN_ID);

    let plugin = SimpleLock::new(SimpleLockOptions {
        lock_manager: StoreLockManager::new(store.clone()),
        plugin_id: PLUGIN_ID.to_string(),
        server_config: server_config(SITE_URL),
        user_directory: users(),
    });

    Harness { plugin, store }
}

pub fn command(text: &str, user_id: &str) -> CommandArgs {
    CommandArgs {
        command: text.to_string(),
        user_id: user_id.to_string(),
        channel_id: "town-square".to_string(),
    }
}

pub fn release_path() -> String {
    format!("/plugins/{PLUGIN_ID}/api/release")
}

pub async fn post(router: Router, path: &str, body: impl Into<Body>) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, body)
}
