//! Path canonicalization and normalization utilities

use crate::error::StorageError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize an existing path and normalize it to NFC
///
/// Resolves `..`, `.` and symlinks of the existing path, then removes trailing
/// separators (except for the root).
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, StorageError> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!(
            "Failed to canonicalize path {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(PathBuf::from(normalize_path_string(&canonical.to_string_lossy())))
}

/// Canonicalize a path that may no longer exist
///
/// Removed items still need a stable path for ancestor walks: the deepest
/// existing ancestor is canonicalized and the missing tail re-appended.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    if let Ok(canonical) = canonicalize_path(path) {
        return canonical;
    }
    let mut tail = Vec::new();
    let mut current = path;
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(mut base) = canonicalize_path(parent) {
            for name in tail.iter().rev() {
                base.push(name);
            }
            return base;
        }
        current = parent;
    }
    PathBuf::from(normalize_path_string(&path.to_string_lossy()))
}

/// Normalize a path string without filesystem access
///
/// Unicode is normalized to NFC and trailing slashes are removed (except root).
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    if result.len() > 1 {
        while result.len() > 1 && (result.ends_with('/') || result.ends_with('\\')) {
            result.pop();
        }
    }
    result
}
