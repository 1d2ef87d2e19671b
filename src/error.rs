//! Error types for the chartscope CLI.
//!
//! A single crate-level error enum covers the failure modes a caller can
//! observe. Per-chart parse problems are deliberately *not* represented here:
//! they are recovered locally by the scanner (falling back to the safest
//! classification) and surface only as log warnings.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all chartscope operations.
#[derive(Debug, Error)]
pub enum ChartScopeError {
    /// The repository path handed to the scanner does not exist.
    #[error("repository not found: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a scan result to JSON failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scan could not be set up (e.g. worker pool construction).
    #[error("scan failed: {0}")]
    ScanFailed(String),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChartScopeError>;
