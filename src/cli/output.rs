//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{MergeError, StorageError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &MergeError) -> String {
    match e {
        MergeError::Storage(StorageError::AlreadyExists(path)) => format!(
            "Error: {} already exists and is not a previous merge folder",
            path.display()
        ),
        other => format!("Error: {}", other),
    }
}
