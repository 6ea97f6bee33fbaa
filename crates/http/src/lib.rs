//! Abstract interface for the HTTP server hosting the release callback.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use axum::Router;
use tokio::task::JoinHandle;

/// Marker trait for `HttpServer` errors
pub trait HttpServerError: Debug + Error + Send + Sync + 'static {}

/// An HTTP server that serves a single router until shut down.
#[async_trait]
pub trait HttpServer: Send + Sync + 'static {
    /// The error type for the server.
    type Error: HttpServerError;

    /// Starts serving `router`. May only be called once.
    ///
    /// The returned handle completes when the server stops, whether through
    /// `shutdown` or because serving failed.
    async fn start(&self, router: Router) -> Result<JoinHandle<()>, Self::Error>;

    /// Stops the server and waits for it to exit.
    async fn shutdown(&self);
}
