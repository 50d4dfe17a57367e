//! In-memory implementation of TreeStore

use crate::error::StorageError;
use crate::store::{Entry, EntryKind, TreeStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Item {
    Folder,
    File(Vec<u8>),
}

/// Tree store held entirely in memory
///
/// Besides the [`TreeStore`] operations it offers setup helpers that create
/// missing parents, and a mutation counter so callers can assert that an
/// operation left the tree untouched.
pub struct MemoryTreeStore {
    root: PathBuf,
    items: RwLock<BTreeMap<PathBuf, Item>>,
    mutations: AtomicUsize,
}

impl MemoryTreeStore {
    /// Create an empty tree whose root folder is `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut items = BTreeMap::new();
        items.insert(root.clone(), Item::Folder);
        Self {
            root,
            items: RwLock::new(items),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Create a folder and any missing parents. Not counted as a mutation.
    pub fn ensure_folder(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        self.check_inside(path)?;
        let mut items = self.items.write();
        for ancestor in path.ancestors() {
            if !ancestor.starts_with(&self.root) {
                break;
            }
            match items.get(ancestor) {
                Some(Item::Folder) => break,
                Some(Item::File(_)) => return Err(StorageError::NotAFolder(ancestor.to_path_buf())),
                None => {}
            }
        }
        let missing: Vec<PathBuf> = path
            .ancestors()
            .take_while(|a| a.starts_with(&self.root) && !items.contains_key(*a))
            .map(Path::to_path_buf)
            .collect();
        for folder in missing {
            items.insert(folder, Item::Folder);
        }
        Ok(())
    }

    /// Write a file, creating missing parent folders. Not counted as a mutation.
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.ensure_folder(parent)?;
        }
        let mut items = self.items.write();
        if let Some(Item::Folder) = items.get(path) {
            return Err(StorageError::AlreadyExists(path.to_path_buf()));
        }
        items.insert(path.to_path_buf(), Item::File(contents.as_ref().to_vec()));
        Ok(())
    }

    /// Content of a file as UTF-8 text, or `None` when there is no such file
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.items.read().get(path.as_ref()) {
            Some(Item::File(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Number of create/copy/delete operations performed through [`TreeStore`]
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Every path below `folder`, sorted
    pub fn descendants(&self, folder: impl AsRef<Path>) -> Vec<PathBuf> {
        let folder = folder.as_ref();
        self.items
            .read()
            .keys()
            .filter(|p| p.as_path() != folder && p.starts_with(folder))
            .cloned()
            .collect()
    }

    fn check_inside(&self, path: &Path) -> Result<(), StorageError> {
        if path.starts_with(&self.root) {
            Ok(())
        } else {
            Err(StorageError::InvalidPath(format!(
                "{} is outside the tree root {}",
                path.display(),
                self.root.display()
            )))
        }
    }

    fn check_parent_folder(
        items: &BTreeMap<PathBuf, Item>,
        path: &Path,
    ) -> Result<(), StorageError> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
        match items.get(parent) {
            Some(Item::Folder) => Ok(()),
            Some(Item::File(_)) => Err(StorageError::NotAFolder(parent.to_path_buf())),
            None => Err(StorageError::NotFound(parent.to_path_buf())),
        }
    }
}

impl TreeStore for MemoryTreeStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn kind(&self, path: &Path) -> Result<Option<EntryKind>, StorageError> {
        Ok(self.items.read().get(path).map(|item| match item {
            Item::Folder => EntryKind::Folder,
            Item::File(_) => EntryKind::File,
        }))
    }

    fn children(&self, folder: &Path) -> Result<Vec<Entry>, StorageError> {
        let items = self.items.read();
        match items.get(folder) {
            Some(Item::Folder) => {}
            Some(Item::File(_)) => return Err(StorageError::NotAFolder(folder.to_path_buf())),
            None => return Err(StorageError::NotFound(folder.to_path_buf())),
        }

        let mut children: Vec<Entry> = items
            .iter()
            .filter(|(path, _)| path.parent() == Some(folder))
            .map(|(path, item)| match item {
                Item::Folder => Entry::folder(path.clone()),
                Item::File(_) => Entry::file(path.clone()),
            })
            .collect();
        children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(children)
    }

    fn create_folder(&self, path: &Path) -> Result<(), StorageError> {
        self.check_inside(path)?;
        let mut items = self.items.write();
        Self::check_parent_folder(&items, path)?;
        if items.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_path_buf()));
        }
        items.insert(path.to_path_buf(), Item::Folder);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), StorageError> {
        self.check_inside(destination)?;
        let mut items = self.items.write();
        let contents = match items.get(source) {
            Some(Item::File(bytes)) => bytes.clone(),
            Some(Item::Folder) => return Err(StorageError::InvalidPath(format!(
                "{} is a folder, not a file",
                source.display()
            ))),
            None => return Err(StorageError::NotFound(source.to_path_buf())),
        };
        Self::check_parent_folder(&items, destination)?;
        if items.contains_key(destination) {
            return Err(StorageError::AlreadyExists(destination.to_path_buf()));
        }
        items.insert(destination.to_path_buf(), Item::File(contents));
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_folder(&self, path: &Path) -> Result<(), StorageError> {
        if path == self.root {
            return Err(StorageError::InvalidPath(format!(
                "Refusing to delete the tree root {}",
                path.display()
            )));
        }
        let mut items = self.items.write();
        match items.get(path) {
            Some(Item::Folder) => {}
            Some(Item::File(_)) => return Err(StorageError::NotAFolder(path.to_path_buf())),
            None => return Err(StorageError::NotFound(path.to_path_buf())),
        }
        items.retain(|p, _| !p.starts_with(path));
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
