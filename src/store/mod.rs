//! Tree Store
//!
//! The host tree the merge reads branches from and writes merge output into.
//! Production code uses the local filesystem; the in-memory store backs tests
//! and embedders that keep their tree elsewhere.

pub mod fs;
pub mod memory;
pub mod path;

pub use fs::FsTreeStore;
pub use memory::MemoryTreeStore;

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of a tree item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Folder,
    File,
}

/// A direct child of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Folder,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// Final path component. Stores only list children with UTF-8 names.
    pub fn name(&self) -> String {
        entry_name(&self.path).unwrap_or_default().to_string()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Final path component of a tree item, when it is valid UTF-8.
pub fn entry_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Tree storage interface
///
/// All paths are absolute and lie under [`TreeStore::root`]. Mutations are not
/// transactional: a failure leaves whatever was written before it.
pub trait TreeStore: Send + Sync {
    /// Root folder of the tree; it has no parent.
    fn root(&self) -> &Path;

    /// Kind of the item at `path`, or `None` when nothing exists there.
    fn kind(&self, path: &Path) -> Result<Option<EntryKind>, StorageError>;

    /// Immediate children of a folder, sorted by name.
    fn children(&self, folder: &Path) -> Result<Vec<Entry>, StorageError>;

    /// Create a folder. Fails when the parent is missing or the path is occupied.
    fn create_folder(&self, path: &Path) -> Result<(), StorageError>;

    /// Copy the content of `source` into a new file at `destination`.
    fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), StorageError>;

    /// Delete a folder and everything below it.
    fn delete_folder(&self, path: &Path) -> Result<(), StorageError>;

    /// Parent folder inside the tree; `None` for the root and for paths outside it.
    fn parent(&self, path: &Path) -> Option<PathBuf> {
        if path == self.root() {
            return None;
        }
        let parent = path.parent()?;
        if parent.starts_with(self.root()) {
            Some(parent.to_path_buf())
        } else {
            None
        }
    }

    /// Whether `path` is the root or lies below it
    fn contains(&self, path: &Path) -> bool {
        path.starts_with(self.root())
    }
}
