//! Materializer: writes a merge tree into a tree store

use crate::error::StorageError;
use crate::store::TreeStore;
use crate::tree::node::MergeFolder;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Counts of what a materialization created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeStats {
    /// Folders created, including the destination itself
    pub folders: usize,
    /// Files copied
    pub files: usize,
}

/// Create `destination`, copy every file child into it and recurse into every
/// folder child. The first storage error aborts; whatever was already written
/// stays in place.
pub fn materialize(
    store: &dyn TreeStore,
    node: &MergeFolder,
    destination: &Path,
) -> Result<MaterializeStats, StorageError> {
    let mut stats = MaterializeStats::default();
    materialize_into(store, node, destination, &mut stats)?;
    Ok(stats)
}

fn materialize_into(
    store: &dyn TreeStore,
    node: &MergeFolder,
    destination: &Path,
    stats: &mut MaterializeStats,
) -> Result<(), StorageError> {
    store.create_folder(destination)?;
    stats.folders += 1;

    for (name, file) in node.files() {
        let target = destination.join(name);
        debug!(source = %file.source().display(), target = %target.display(), "Copying file");
        store.copy_file(file.source(), &target)?;
        stats.files += 1;
    }

    for (name, folder) in node.folders() {
        materialize_into(store, folder, &destination.join(name), stats)?;
    }

    Ok(())
}
