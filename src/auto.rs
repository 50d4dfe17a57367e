//! Automatic merge policy
//!
//! Decides whether a tree mutation should regenerate a merge and where that
//! merge belongs. The merge root is the parent of the outermost branch
//! folder above (or at) the changed item.

use crate::branch::is_branch;
use crate::config::AutoMergeMode;
use crate::error::{MergeError, StorageError};
use crate::merge::{MergeOutcome, Merger};
use crate::notice;
use crate::store::{entry_name, EntryKind, TreeStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A mutation of the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    /// `kind` is what the item was, when the event source knows it
    Removed { path: PathBuf, kind: Option<EntryKind> },
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// The item the policy looks at; renames use the new path
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(path)
            | ChangeEvent::Modified(path)
            | ChangeEvent::Removed { path, .. } => path,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }

    /// Kind reported with a removal
    pub fn removed_kind(&self) -> Option<EntryKind> {
        match self {
            ChangeEvent::Removed { kind, .. } => *kind,
            _ => None,
        }
    }
}

/// Why an event did not trigger a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    MergeInFlight,
    Disabled,
    OutsideBranches,
}

/// What the policy did with an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AutoMergeDecision {
    Ignored { reason: IgnoreReason },
    Triggered { root: PathBuf, outcome: MergeOutcome },
}

fn is_branch_path(path: &Path) -> bool {
    entry_name(path).map(is_branch).unwrap_or(false)
}

/// Folder whose merge a change to `item` belongs to, if any.
///
/// A branch folder proposes its own parent; then every ancestor up to the
/// store root is visited and each branch ancestor replaces the candidate with
/// its parent, so the outermost branch decides. A removed item of unknown
/// kind is treated as a folder when its name classifies as a branch.
pub fn resolve_merge_root(
    store: &dyn TreeStore,
    item: &Path,
) -> Result<Option<PathBuf>, StorageError> {
    resolve_with_kind(store, item, None)
}

/// Merge root for a change event, using the kind a removal reported
pub fn resolve_event_root(
    store: &dyn TreeStore,
    event: &ChangeEvent,
) -> Result<Option<PathBuf>, StorageError> {
    resolve_with_kind(store, event.path(), event.removed_kind())
}

fn resolve_with_kind(
    store: &dyn TreeStore,
    item: &Path,
    removed_kind: Option<EntryKind>,
) -> Result<Option<PathBuf>, StorageError> {
    if !store.contains(item) {
        return Ok(None);
    }

    let is_folder = match store.kind(item)?.or(removed_kind) {
        Some(EntryKind::Folder) => true,
        Some(EntryKind::File) => false,
        None => is_branch_path(item),
    };

    let mut candidate = None;
    if is_folder && is_branch_path(item) {
        candidate = store.parent(item);
    }

    let mut ancestor = store.parent(item);
    while let Some(folder) = ancestor {
        if is_branch_path(&folder) {
            candidate = store.parent(&folder);
        }
        ancestor = store.parent(&folder);
    }

    Ok(candidate)
}

/// Applies the automatic merge policy to change events
pub struct AutoMerger {
    merger: Arc<Merger>,
}

impl AutoMerger {
    pub fn new(merger: Arc<Merger>) -> Self {
        Self { merger }
    }

    pub fn merger(&self) -> &Arc<Merger> {
        &self.merger
    }

    fn precheck(&self) -> Result<AutoMergeMode, IgnoreReason> {
        if self.merger.is_merging() {
            return Err(IgnoreReason::MergeInFlight);
        }
        let mode = self.merger.settings().read().auto_merge;
        if !mode.is_enabled() {
            return Err(IgnoreReason::Disabled);
        }
        Ok(mode)
    }

    fn trigger(&self, mode: AutoMergeMode, root: PathBuf) -> Result<AutoMergeDecision, MergeError> {
        if mode == AutoMergeMode::Yes {
            self.merger
                .notifier()
                .notice(notice::UPDATING_MERGE, Some(notice::UPDATING_MERGE_DURATION));
        }
        info!(root = %root.display(), mode = %mode, "Automatic merge");
        let outcome = self.merger.merge(&root)?;
        Ok(AutoMergeDecision::Triggered { root, outcome })
    }

    /// Handle a single change event
    pub fn on_change(&self, event: &ChangeEvent) -> Result<AutoMergeDecision, MergeError> {
        let mode = match self.precheck() {
            Ok(mode) => mode,
            Err(reason) => return Ok(AutoMergeDecision::Ignored { reason }),
        };

        match resolve_event_root(self.merger.store(), event)? {
            Some(root) => self.trigger(mode, root),
            None => {
                debug!(path = %event.path().display(), "Change outside any branch");
                Ok(AutoMergeDecision::Ignored {
                    reason: IgnoreReason::OutsideBranches,
                })
            }
        }
    }

    /// Handle a batch of events, merging each distinct root once
    pub fn on_batch(&self, events: &[ChangeEvent]) -> Result<Vec<AutoMergeDecision>, MergeError> {
        let mode = match self.precheck() {
            Ok(mode) => mode,
            Err(reason) => return Ok(vec![AutoMergeDecision::Ignored { reason }]),
        };

        let mut roots: Vec<PathBuf> = Vec::new();
        for event in events {
            if let Some(root) = resolve_event_root(self.merger.store(), event)? {
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }

        if roots.is_empty() {
            debug!(event_count = events.len(), "Batch outside any branch");
            return Ok(vec![AutoMergeDecision::Ignored {
                reason: IgnoreReason::OutsideBranches,
            }]);
        }

        roots
            .into_iter()
            .map(|root| self.trigger(mode, root))
            .collect()
    }
}
