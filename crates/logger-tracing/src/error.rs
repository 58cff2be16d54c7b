use thiserror::Error;

/// Result type for bridge installation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while installing the bridge.
#[derive(Debug, Error)]
pub enum Error {
    /// Another global `tracing` subscriber is already installed.
    #[error(transparent)]
    SetTracing(#[from] tracing_subscriber::util::TryInitError),
}
