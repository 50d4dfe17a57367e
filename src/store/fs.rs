//! Local filesystem implementation of TreeStore

use crate::error::StorageError;
use crate::store::path::canonicalize_path;
use crate::store::{Entry, EntryKind, TreeStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Tree store rooted at a directory on the local filesystem
///
/// Symbolic links are neither followed nor reported as children.
pub struct FsTreeStore {
    root: PathBuf,
}

impl FsTreeStore {
    /// Open a store at `root`. The root must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = canonicalize_path(root.as_ref())?;
        if !root.is_dir() {
            return Err(StorageError::NotAFolder(root));
        }
        Ok(Self { root })
    }
}

fn map_io(err: std::io::Error, path: &Path) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
        ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.to_path_buf()),
        _ => StorageError::IoError(err),
    }
}

impl TreeStore for FsTreeStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn kind(&self, path: &Path) -> Result<Option<EntryKind>, StorageError> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Folder)),
            Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn children(&self, folder: &Path) -> Result<Vec<Entry>, StorageError> {
        match self.kind(folder)? {
            Some(EntryKind::Folder) => {}
            Some(EntryKind::File) => return Err(StorageError::NotAFolder(folder.to_path_buf())),
            None => return Err(StorageError::NotFound(folder.to_path_buf())),
        }

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| StorageError::IoError(std::io::Error::from(e)))?;
            if entry.file_name().to_str().is_none() {
                warn!(path = %entry.path().display(), "Skipping entry with a non UTF-8 name");
                continue;
            }
            let file_type = entry.file_type();
            if file_type.is_dir() {
                entries.push(Entry::folder(entry.into_path()));
            } else if file_type.is_file() {
                entries.push(Entry::file(entry.into_path()));
            }
        }
        Ok(entries)
    }

    fn create_folder(&self, path: &Path) -> Result<(), StorageError> {
        trace!(path = %path.display(), "create folder");
        fs::create_dir(path).map_err(|e| map_io(e, path))
    }

    fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), StorageError> {
        trace!(source = %source.display(), destination = %destination.display(), "copy file");
        if fs::symlink_metadata(destination).is_ok() {
            return Err(StorageError::AlreadyExists(destination.to_path_buf()));
        }
        fs::copy(source, destination).map(|_| ()).map_err(|e| {
            if fs::symlink_metadata(source).is_ok() {
                map_io(e, destination)
            } else {
                map_io(e, source)
            }
        })
    }

    fn delete_folder(&self, path: &Path) -> Result<(), StorageError> {
        trace!(path = %path.display(), "delete folder");
        if path == self.root {
            return Err(StorageError::InvalidPath(format!(
                "Refusing to delete the tree root {}",
                path.display()
            )));
        }
        fs::remove_dir_all(path).map_err(|e| map_io(e, path))
    }
}
