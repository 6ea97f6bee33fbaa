use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use simplelock_locks::InvalidResource;
use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Core already started.
    #[error("core already started")]
    AlreadyStarted,

    /// HTTP server error.
    #[error("http server error: {0}")]
    HttpServer(String),

    /// HTTP server stopped while the core was running.
    #[error("http server stopped unexpectedly")]
    HttpServerStopped,

    /// Malformed command or callback input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requesting user could not be resolved.
    #[error("user lookup failed: {0}")]
    UserLookup(String),
}

impl From<InvalidResource> for Error {
    fn from(error: InvalidResource) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

// Bodies stay empty: nothing internal is shown to the caller.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST.into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
