//! Merge node model
//!
//! An in-memory tree describing the overlay result before anything is written.
//! Folders union their contents when registered twice under one name; files
//! are replaced by the last registration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Leaf node: the one source file whose content ends up at this name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFile {
    source: PathBuf,
}

impl MergeFile {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Composite node: named folder and file children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeFolder {
    folders: BTreeMap<String, MergeFolder>,
    files: BTreeMap<String, MergeFile>,
}

/// A child registered into a [`MergeFolder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeNode {
    Folder(MergeFolder),
    File(MergeFile),
}

/// Borrowed view of a child, as returned by lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeNodeRef<'a> {
    Folder(&'a MergeFolder),
    File(&'a MergeFile),
}

impl MergeFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child under `name`.
    ///
    /// A folder is unioned into an existing folder of the same name, the
    /// existing one staying the accumulator. A file replaces an existing file.
    /// Files and folders share one name space; on a clash the folder is kept.
    pub fn insert(&mut self, name: &str, node: MergeNode) {
        match node {
            MergeNode::File(file) => {
                if self.folders.contains_key(name) {
                    warn!(entry = name, source = %file.source.display(), "File shadowed by folder of the same name");
                    return;
                }
                self.files.insert(name.to_string(), file);
            }
            MergeNode::Folder(folder) => {
                if let Some(file) = self.files.remove(name) {
                    warn!(entry = name, source = %file.source.display(), "Folder replaces file of the same name");
                }
                match self.folders.get_mut(name) {
                    Some(existing) => existing.absorb(folder),
                    None => {
                        self.folders.insert(name.to_string(), folder);
                    }
                }
            }
        }
    }

    pub fn add_folder(&mut self, name: &str, folder: MergeFolder) {
        self.insert(name, MergeNode::Folder(folder));
    }

    pub fn add_file(&mut self, name: &str, file: MergeFile) {
        self.insert(name, MergeNode::File(file));
    }

    /// Overlay every child of `other` onto this folder: files first, then folders.
    pub fn absorb(&mut self, other: MergeFolder) {
        for (name, file) in other.files {
            self.insert(&name, MergeNode::File(file));
        }
        for (name, folder) in other.folders {
            self.insert(&name, MergeNode::Folder(folder));
        }
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &MergeFile)> {
        self.files.iter().map(|(name, file)| (name.as_str(), file))
    }

    pub fn folders(&self) -> impl Iterator<Item = (&str, &MergeFolder)> {
        self.folders.iter().map(|(name, folder)| (name.as_str(), folder))
    }

    pub fn file(&self, name: &str) -> Option<&MergeFile> {
        self.files.get(name)
    }

    pub fn folder(&self, name: &str) -> Option<&MergeFolder> {
        self.folders.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    /// Look up a descendant by a relative path such as `sub/y.md`.
    pub fn get(&self, relative: impl AsRef<Path>) -> Option<MergeNodeRef<'_>> {
        let mut current = self;
        let mut components = relative.as_ref().iter().peekable();
        while let Some(component) = components.next() {
            let name = component.to_str()?;
            if components.peek().is_none() {
                if let Some(folder) = current.folders.get(name) {
                    return Some(MergeNodeRef::Folder(folder));
                }
                return current.files.get(name).map(MergeNodeRef::File);
            }
            current = current.folders.get(name)?;
        }
        Some(MergeNodeRef::Folder(current))
    }

    /// Number of files in this subtree
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.values().map(MergeFolder::file_count).sum::<usize>()
    }

    /// Number of folders in this subtree, excluding this one
    pub fn folder_count(&self) -> usize {
        self.folders.len() + self.folders.values().map(MergeFolder::folder_count).sum::<usize>()
    }
}
