//! Core logic for the lock plugin: the `lock` command, the release
//! callback, and the service hosting it.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod command;
mod config;
mod context;
mod error;
mod handlers;
pub mod model;
mod plugin;

pub use command::{Command, ParsedCommand, TRIGGER, command, parse_command};
pub use config::{RELEASE_PATH, ServerConfig};
pub use context::LockContext;
pub use error::{Error, Result};
pub use plugin::{PLUGIN_ID, RELEASE_ACTION_NAME, SimpleLock, SimpleLockOptions};

use simplelock_http::HttpServer;
use simplelock_locks::LockManager;
use simplelock_users::UserDirectory;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Runs a `SimpleLock` behind an HTTP server.
pub struct Core<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    plugin: SimpleLock<LM, UD>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl<LM, UD> Core<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    /// Create new core.
    pub fn new(plugin: SimpleLock<LM, UD>) -> Self {
        Self {
            plugin,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// The plugin served by this core.
    pub const fn plugin(&self) -> &SimpleLock<LM, UD> {
        &self.plugin
    }

    /// Start the core.
    ///
    /// The returned handle completes when the core is shut down, or with
    /// an error if the HTTP server stops on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the core was already started or the HTTP server
    /// fails to start.
    pub async fn start<HS>(&self, http_server: HS) -> Result<JoinHandle<Result<()>>>
    where
        HS: HttpServer,
    {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let http_handle = http_server
            .start(self.plugin.router())
            .await
            .map_err(|e| Error::HttpServer(e.to_string()))?;

        info!(plugin_id = %self.plugin.plugin_id(), "core started");

        let shutdown_token = self.shutdown_token.clone();
        let handle = self.task_tracker.spawn(async move {
            tokio::select! {
                () = shutdown_token.cancelled() => {
                    info!("shutdown command received");
                    http_server.shutdown().await;

                    Ok(())
                }
                _ = http_handle => {
                    error!("http server stopped unexpectedly");

                    Err(Error::HttpServerStopped)
                }
            }
        });

        self.task_tracker.close();

        Ok(handle)
    }

    /// Shutdown the core.
    pub async fn shutdown(&self) {
        info!("core shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("core shutdown");
    }
}
