//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The extraction pipeline failed.
    #[error("extraction failed: {0}")]
    Extract(#[from] calsnap_extract::ExtractError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The event store file could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] serde_json::Error),

    /// The image file extension is not a supported format.
    #[error("unsupported image format: {0} (expected png, jpeg, webp, or gif)")]
    UnsupportedImage(String),
}
