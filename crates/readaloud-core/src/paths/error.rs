//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),

    /// The service root has no parent to use as the library root.
    #[error("{0} has no parent directory to scan for books")]
    NoParentDir(PathBuf),

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}
