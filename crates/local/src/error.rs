use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Config file could not be parsed.
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    /// Core error.
    #[error(transparent)]
    Core(#[from] simplelock_core::Error),

    /// IO error.
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),

    /// A background task panicked or was cancelled.
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /// Could not set global default subscriber.
    #[error("could not set global default subscriber: {0}")]
    SetTracing(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
