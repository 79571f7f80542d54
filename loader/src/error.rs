//! Error types for loading records and configuration.
//!
//! Validation failures are not errors at this level: a rejected record is
//! reported in its [`Outcome`](crate::Outcome). These errors cover the
//! surrounding plumbing only.

use thiserror::Error;

/// Errors that can occur while collecting inputs or loading configuration.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid YAML or has unknown fields.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid or missing input (e.g. non-existent path).
    #[error("{0}")]
    InvalidInput(String),

    /// Thread pool for batch validation could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
