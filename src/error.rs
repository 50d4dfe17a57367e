//! Error types for the branch merge system.

use std::path::PathBuf;
use thiserror::Error;

/// Tree storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Path already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Not a folder: {0}")]
    NotAFolder(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by merge, policy, watch and configuration operations
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl From<config::ConfigError> for MergeError {
    fn from(err: config::ConfigError) -> Self {
        MergeError::ConfigError(err.to_string())
    }
}
