//! Implementation of simple non-secure HTTP, for running behind a TLS
//! terminating proxy or locally.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod error;

pub use error::Error;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::OnceLock;

use async_trait::async_trait;
use axum::Router;
use simplelock_http::HttpServer;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Simple non-secure HTTP server.
pub struct InsecureHttpServer {
    listen_addr: SocketAddr,
    local_addr: OnceLock<SocketAddr>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl InsecureHttpServer {
    /// Creates a new instance of `InsecureHttpServer`.
    #[must_use]
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            local_addr: OnceLock::new(),
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// The address actually bound, once started. Differs from the listen
    /// address when listening on port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }
}

#[async_trait]
impl HttpServer for InsecureHttpServer {
    type Error = Error;

    async fn start(&self, router: Router) -> Result<JoinHandle<()>, Self::Error> {
        let shutdown_token = self.shutdown_token.clone();

        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(Error::Bind)?;

        if let Ok(addr) = listener.local_addr() {
            let _ = self.local_addr.set(addr);
            info!(%addr, "http server listening");
        }

        let handle = self.task_tracker.spawn(async move {
            tokio::select! {
                result = axum::serve(listener, router.into_make_service()).into_future() => {
                    if let Err(e) = result {
                        error!(error = ?e, "http server exited");
                    } else {
                        info!("http server exited");
                    }
                }
                () = shutdown_token.cancelled() => {}
            };
        });

        self.task_tracker.close();

        Ok(handle)
    }

    async fn shutdown(&self) {
        info!("http server shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("http server shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_serves_router_until_shutdown() {
        let server = InsecureHttpServer::new(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)));
        let router = Router::new().route("/ping", get(|| async { "pong" }));

        let handle = server.start(router).await.unwrap();
        let addr = server.local_addr().unwrap();

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("pong"));

        server.shutdown().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let server = InsecureHttpServer::new(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)));

        server.start(Router::new()).await.unwrap();
        let second = server.start(Router::new()).await;

        assert!(matches!(second, Err(Error::AlreadyStarted)));

        server.shutdown().await;
    }
}
