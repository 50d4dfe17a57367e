//! Merge Orchestrator
//!
//! Runs one merge end to end: scans the branches of a folder, deletes the
//! previous output, builds the overlay and writes it under the merge folder
//! name. At most one merge runs at a time; a second request while one is in
//! flight is refused with a notice instead of being queued.

use crate::config::{MergeSettings, SharedSettings};
use crate::error::MergeError;
use crate::notice::{self, Notifier};
use crate::store::{EntryKind, TreeStore};
use crate::tree::{materialize, MaterializeStats, TreeBuilder};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Whether a merge is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeState {
    Idle,
    Merging,
}

/// Result of a merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The merge folder was (re)written
    Merged(MergeReport),
    /// Another merge was in flight; nothing was touched
    AlreadyMerging,
    /// The folder has no branch children; nothing was touched
    NoBranches,
}

/// What a completed merge produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Folder whose branches were merged
    pub folder: PathBuf,
    /// The written merge folder
    pub output: PathBuf,
    pub branch_count: usize,
    pub stats: MaterializeStats,
    /// Whether an earlier merge folder was deleted first
    pub replaced_previous: bool,
}

/// Resets the state to `Idle` when dropped
struct MergingGuard<'a> {
    state: &'a Mutex<MergeState>,
}

impl Drop for MergingGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = MergeState::Idle;
    }
}

/// Merge orchestrator
pub struct Merger {
    store: Arc<dyn TreeStore>,
    notifier: Arc<dyn Notifier>,
    settings: SharedSettings,
    state: Mutex<MergeState>,
}

impl Merger {
    pub fn new(
        store: Arc<dyn TreeStore>,
        notifier: Arc<dyn Notifier>,
        settings: SharedSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
            state: Mutex::new(MergeState::Idle),
        }
    }

    pub fn store(&self) -> &dyn TreeStore {
        self.store.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Snapshot of the current settings
    pub fn current_settings(&self) -> MergeSettings {
        self.settings.read().clone()
    }

    pub fn state(&self) -> MergeState {
        *self.state.lock()
    }

    pub fn is_merging(&self) -> bool {
        self.state() == MergeState::Merging
    }

    /// Flip `Idle` to `Merging`, or fail when a merge is already running.
    fn try_begin(&self) -> Option<MergingGuard<'_>> {
        let mut state = self.state.lock();
        if *state == MergeState::Merging {
            return None;
        }
        *state = MergeState::Merging;
        Some(MergingGuard { state: &self.state })
    }

    /// Merge the branches directly under `folder` into `folder/<merge name>`
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    pub fn merge(&self, folder: &Path) -> Result<MergeOutcome, MergeError> {
        let _guard = match self.try_begin() {
            Some(guard) => guard,
            None => {
                warn!("Merge requested while another merge is running");
                self.notifier.notice(notice::ALREADY_MERGING, None);
                return Ok(MergeOutcome::AlreadyMerging);
            }
        };

        let start = Instant::now();
        let merge_name = self.settings.read().merge_name.clone();
        let builder = TreeBuilder::new(self.store.as_ref(), merge_name.as_str());

        let branches = builder.fetch_branches(folder)?;
        if branches.is_empty() {
            info!("No branches found");
            self.notifier.notice(notice::NO_BRANCHES, None);
            return Ok(MergeOutcome::NoBranches);
        }
        let branch_count = branches.len();
        info!(branch_count, merge_name = %merge_name, "Merge started");

        let output = folder.join(&merge_name);
        let replaced_previous = match self.store.kind(&output)? {
            Some(EntryKind::Folder) => {
                debug!(output = %output.display(), "Deleting previous merge");
                self.store.delete_folder(&output)?;
                true
            }
            _ => false,
        };

        let tree = builder.build_merge_tree(branches)?;
        let stats = materialize(self.store.as_ref(), &tree, &output)?;

        info!(
            output = %output.display(),
            branch_count,
            folders = stats.folders,
            files = stats.files,
            duration_ms = start.elapsed().as_millis(),
            "Merge completed"
        );

        Ok(MergeOutcome::Merged(MergeReport {
            folder: folder.to_path_buf(),
            output,
            branch_count,
            stats,
            replaced_previous,
        }))
    }
}
