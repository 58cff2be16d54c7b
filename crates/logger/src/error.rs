//! Error types for logger configuration

use std::io;
use std::path::PathBuf;

/// Result type for logger configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while configuring the logger.
///
/// Only configuration surfaces are fallible. Emitting a line never
/// returns an error: writer failures degrade to a missing line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to create the log file's parent directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The path that failed to be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
