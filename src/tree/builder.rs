//! Merge tree builder
//!
//! Scans a tree store and produces the [`MergeFolder`] that overlays a set of
//! sibling branches. Nested branch sets inside plain folders become their own
//! sub-merge, registered under the merge folder name.

use crate::branch::Branch;
use crate::error::StorageError;
use crate::store::{entry_name, EntryKind, TreeStore};
use crate::tree::node::{MergeFile, MergeFolder};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Builds merge trees from a [`TreeStore`]
pub struct TreeBuilder<'a> {
    store: &'a dyn TreeStore,
    merge_name: String,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder that names nested merges `merge_name`
    pub fn new(store: &'a dyn TreeStore, merge_name: impl Into<String>) -> Self {
        Self {
            store,
            merge_name: merge_name.into(),
        }
    }

    pub fn merge_name(&self) -> &str {
        &self.merge_name
    }

    /// A folder carrying the merge name is output, never a branch, even when
    /// the name reads as a date.
    fn is_merge_output(&self, path: &Path) -> bool {
        entry_name(path) == Some(self.merge_name.as_str())
    }

    /// Branches among the immediate children of `folder`
    ///
    /// Files and plain folders next to the branches are not part of the merge
    /// at this level.
    pub fn fetch_branches(&self, folder: &Path) -> Result<Vec<Branch>, StorageError> {
        let branches: Vec<Branch> = self
            .store
            .children(folder)?
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::Folder)
            .filter(|entry| !self.is_merge_output(&entry.path))
            .filter_map(|entry| Branch::classify(&entry.path))
            .collect();
        debug!(folder = %folder.display(), branch_count = branches.len(), "Fetched branches");
        Ok(branches)
    }

    /// Overlay `branches` in ascending date order into one merge tree
    #[instrument(skip(self, branches), fields(branch_count = branches.len()))]
    pub fn build_merge_tree(&self, mut branches: Vec<Branch>) -> Result<MergeFolder, StorageError> {
        let start = Instant::now();
        sort_branches(&mut branches);

        let mut root = MergeFolder::new();
        for branch in &branches {
            debug!(branch = %branch.name(), date = %branch.date, "Overlaying branch");
            self.populate_merge(&mut root, &branch.path)?;
        }

        info!(
            files = root.file_count(),
            folders = root.folder_count(),
            duration_ms = start.elapsed().as_millis(),
            "Merge tree built"
        );
        Ok(root)
    }

    /// Register the contents of `source` into `target`
    ///
    /// Files overwrite, plain folders are built recursively and unioned, and
    /// branch folders found here are merged on their own and attached under
    /// the merge folder name.
    pub fn populate_merge(&self, target: &mut MergeFolder, source: &Path) -> Result<(), StorageError> {
        let mut nested = Vec::new();

        for entry in self.store.children(source)? {
            let name = entry.name();
            match entry.kind {
                EntryKind::Folder => match Branch::classify(&entry.path) {
                    Some(_) if self.is_merge_output(&entry.path) => {
                        debug!(path = %entry.path.display(), "Skipping previous merge output");
                    }
                    Some(branch) => nested.push(branch),
                    None => {
                        let mut sub = MergeFolder::new();
                        self.populate_merge(&mut sub, &entry.path)?;
                        target.add_folder(&name, sub);
                    }
                },
                EntryKind::File => target.add_file(&name, MergeFile::new(entry.path)),
            }
        }

        if !nested.is_empty() {
            debug!(
                folder = %source.display(),
                branch_count = nested.len(),
                "Nested branches found"
            );
            let sub_merge = self.build_merge_tree(nested)?;
            target.add_folder(&self.merge_name, sub_merge);
        }

        Ok(())
    }
}

/// Sort branches by ascending date; equal dates keep their scan order.
pub fn sort_branches(branches: &mut [Branch]) {
    branches.sort_by(|a, b| a.date.cmp(&b.date));
}
