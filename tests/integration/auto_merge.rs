//! Automatic merge policy against the local filesystem

use branchfold::auto::{resolve_merge_root, AutoMergeDecision, AutoMerger, ChangeEvent, IgnoreReason};
use branchfold::config::{shared, AutoMergeMode, MergeSettings};
use branchfold::merge::{MergeOutcome, Merger};
use branchfold::notice::{self, RecordingNotifier};
use branchfold::store::{EntryKind, FsTreeStore, TreeStore};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::write_file;

fn setup(mode: AutoMergeMode) -> (TempDir, PathBuf, Arc<RecordingNotifier>, AutoMerger) {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path().join("Notes/2024-01-01 - A/x.md"), "v1");
    write_file(temp_dir.path().join("Notes/2024-02-01 - B/x.md"), "v2");
    write_file(temp_dir.path().join("Notes/loose.md"), "loose");

    let store = Arc::new(FsTreeStore::new(temp_dir.path()).unwrap());
    let root = store.root().to_path_buf();
    let notifier = Arc::new(RecordingNotifier::new());
    let settings = shared(MergeSettings {
        auto_merge: mode,
        ..MergeSettings::default()
    });
    let merger = Arc::new(Merger::new(store, notifier.clone(), settings));
    (temp_dir, root, notifier, AutoMerger::new(merger))
}

#[test]
fn test_modified_file_in_branch_updates_merge() {
    let (_temp_dir, root, notifier, auto) = setup(AutoMergeMode::Yes);
    let changed = root.join("Notes/2024-02-01 - B/x.md");
    fs::write(&changed, "v3").unwrap();

    let decision = auto.on_change(&ChangeEvent::Modified(changed)).unwrap();

    match decision {
        AutoMergeDecision::Triggered { root: merge_root, outcome } => {
            assert_eq!(merge_root, root.join("Notes"));
            assert!(matches!(outcome, MergeOutcome::Merged(_)));
        }
        other => panic!("expected a merge, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(root.join("Notes/Merge/x.md")).unwrap(), "v3");
    assert_eq!(notifier.messages(), vec![notice::UPDATING_MERGE]);
}

#[test]
fn test_removed_branch_folder_triggers_merge_of_parent() {
    let (_temp_dir, root, notifier, auto) = setup(AutoMergeMode::Silently);
    let removed = root.join("Notes/2024-02-01 - B");
    fs::remove_dir_all(&removed).unwrap();

    auto.on_change(&ChangeEvent::Removed {
        path: removed,
        kind: Some(EntryKind::Folder),
    })
    .unwrap();

    assert_eq!(fs::read_to_string(root.join("Notes/Merge/x.md")).unwrap(), "v1");
    assert!(notifier.notices().is_empty());
}

#[test]
fn test_disabled_mode_ignores_everything() {
    let (_temp_dir, root, _notifier, auto) = setup(AutoMergeMode::No);

    let decision = auto
        .on_change(&ChangeEvent::Created(root.join("Notes/2024-01-01 - A/x.md")))
        .unwrap();

    assert_eq!(
        decision,
        AutoMergeDecision::Ignored {
            reason: IgnoreReason::Disabled
        }
    );
    assert!(!root.join("Notes/Merge").exists());
}

#[test]
fn test_switching_mode_at_runtime() {
    let (_temp_dir, root, _notifier, auto) = setup(AutoMergeMode::No);
    let event = ChangeEvent::Modified(root.join("Notes/2024-01-01 - A/x.md"));
    assert!(matches!(
        auto.on_change(&event).unwrap(),
        AutoMergeDecision::Ignored { .. }
    ));

    auto.merger().settings().write().auto_merge = AutoMergeMode::Silently;

    assert!(matches!(
        auto.on_change(&event).unwrap(),
        AutoMergeDecision::Triggered { .. }
    ));
    assert!(root.join("Notes/Merge/x.md").exists());
}

#[test]
fn test_loose_file_outside_branches() {
    let (_temp_dir, root, _notifier, auto) = setup(AutoMergeMode::Yes);

    assert_eq!(
        resolve_merge_root(auto.merger().store(), &root.join("Notes/loose.md")).unwrap(),
        None
    );
    let decision = auto
        .on_change(&ChangeEvent::Modified(root.join("Notes/loose.md")))
        .unwrap();
    assert_eq!(
        decision,
        AutoMergeDecision::Ignored {
            reason: IgnoreReason::OutsideBranches
        }
    );
}
