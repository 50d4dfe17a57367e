//! End-to-end merges against the local filesystem

use branchfold::config::{shared, AutoMergeMode, MergeSettings};
use branchfold::error::{MergeError, StorageError};
use branchfold::merge::{MergeOutcome, MergeState, Merger};
use branchfold::notice::{self, RecordingNotifier};
use branchfold::store::{FsTreeStore, TreeStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::write_file;

struct Fixture {
    _temp_dir: TempDir,
    root: PathBuf,
    notifier: Arc<RecordingNotifier>,
    merger: Merger,
}

fn fixture(merge_name: &str, build: impl FnOnce(&Path)) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    build(temp_dir.path());
    let store = Arc::new(FsTreeStore::new(temp_dir.path()).unwrap());
    let root = store.root().to_path_buf();
    let notifier = Arc::new(RecordingNotifier::new());
    let settings = shared(MergeSettings {
        merge_name: merge_name.to_string(),
        auto_merge: AutoMergeMode::No,
    });
    let merger = Merger::new(store, notifier.clone(), settings);
    Fixture {
        _temp_dir: temp_dir,
        root,
        notifier,
        merger,
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn scenario(base: &Path) {
    write_file(base.join("Root/2024-01-01 - A/x.md"), "v1");
    write_file(base.join("Root/2024-01-01 - A/sub/y.md"), "v1");
    write_file(base.join("Root/2024-02-01 - B/x.md"), "v2");
    write_file(base.join("Root/2024-02-01 - B/sub/z.md"), "v1");
}

#[test]
fn test_scenario_later_branch_wins() {
    let fx = fixture("Merge", scenario);

    let outcome = fx.merger.merge(&fx.root.join("Root")).unwrap();

    assert!(matches!(outcome, MergeOutcome::Merged(_)));
    let merge = fx.root.join("Root").join("Merge");
    assert_eq!(read(merge.join("x.md")), "v2");
    assert_eq!(read(merge.join("sub").join("y.md")), "v1");
    assert_eq!(read(merge.join("sub").join("z.md")), "v1");
    // Branches are untouched
    assert_eq!(read(fx.root.join("Root/2024-01-01 - A/x.md")), "v1");
}

#[test]
fn test_branch_order_follows_date_not_name() {
    let fx = fixture("Merge", |base| {
        write_file(base.join("F/March 5, 2024 - late/a.md"), "late");
        write_file(base.join("F/2024-01-10 - early/a.md"), "early");
    });

    fx.merger.merge(&fx.root.join("F")).unwrap();

    assert_eq!(read(fx.root.join("F/Merge/a.md")), "late");
}

#[test]
fn test_second_merge_leaves_no_stale_files() {
    let fx = fixture("Merge", scenario);
    let root = fx.root.join("Root");
    fx.merger.merge(&root).unwrap();

    fs::remove_file(root.join("2024-01-01 - A/sub/y.md")).unwrap();
    let outcome = fx.merger.merge(&root).unwrap();

    match outcome {
        MergeOutcome::Merged(report) => assert!(report.replaced_previous),
        other => panic!("expected a merge, got {:?}", other),
    }
    assert!(!root.join("Merge/sub/y.md").exists());
    assert_eq!(read(root.join("Merge/sub/z.md")), "v1");
}

#[test]
fn test_nested_branch_set_inside_plain_folder() {
    let fx = fixture("Merge", |base| {
        write_file(base.join("2024-01-01 - A/chapters/2023-01-01/c.md"), "c1");
        write_file(base.join("2024-01-01 - A/chapters/2023-06-01/c.md"), "c2");
        write_file(base.join("2024-02-01 - B/chapters/2023-03-01/d.md"), "d1");
        write_file(base.join("2024-02-01 - B/chapters/intro.md"), "intro");
    });

    fx.merger.merge(&fx.root).unwrap();

    let nested = fx.root.join("Merge/chapters/Merge");
    assert_eq!(read(nested.join("c.md")), "c2");
    assert_eq!(read(nested.join("d.md")), "d1");
    assert_eq!(read(fx.root.join("Merge/chapters/intro.md")), "intro");
    assert!(!fx.root.join("Merge/chapters/2023-01-01").exists());
}

#[test]
fn test_top_level_files_and_plain_folders_are_not_merged() {
    let fx = fixture("Merge", |base| {
        scenario(base);
        write_file(base.join("Root/readme.md"), "top");
        write_file(base.join("Root/Archive/old.md"), "old");
    });

    fx.merger.merge(&fx.root.join("Root")).unwrap();

    assert!(!fx.root.join("Root/Merge/readme.md").exists());
    assert!(!fx.root.join("Root/Merge/Archive").exists());
}

#[test]
fn test_no_branches_notifies_and_writes_nothing() {
    let fx = fixture("Merge", |base| write_file(base.join("Plain/a.md"), "a"));

    let outcome = fx.merger.merge(&fx.root.join("Plain")).unwrap();

    assert_eq!(outcome, MergeOutcome::NoBranches);
    assert_eq!(fx.notifier.messages(), vec![notice::NO_BRANCHES]);
    assert!(!fx.root.join("Plain/Merge").exists());
    assert_eq!(fx.merger.state(), MergeState::Idle);
}

#[test]
fn test_file_in_place_of_merge_folder_fails_and_releases_state() {
    let fx = fixture("Merge", |base| {
        scenario(base);
        write_file(base.join("Root/Merge"), "occupied");
    });

    let result = fx.merger.merge(&fx.root.join("Root"));

    assert!(matches!(
        result,
        Err(MergeError::Storage(StorageError::AlreadyExists(_)))
    ));
    assert!(!fx.merger.is_merging());
    assert_eq!(read(fx.root.join("Root/Merge")), "occupied");
}

#[test]
fn test_custom_merge_name() {
    let fx = fixture("Digest", scenario);

    fx.merger.merge(&fx.root.join("Root")).unwrap();

    assert_eq!(read(fx.root.join("Root/Digest/x.md")), "v2");
    assert!(!fx.root.join("Root/Merge").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_left_out_of_the_merge() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = fixture("Merge", |base| {
        write_file(base.join("Root/2024-01-01 - A/ok.md"), "ok");
        let branch = base.join("Root/2024-01-01 - A");
        fs::write(branch.join(OsStr::from_bytes(b"bad\xffname.md")), "bad").unwrap();
    });

    let outcome = fx.merger.merge(&fx.root.join("Root")).unwrap();

    let report = match outcome {
        MergeOutcome::Merged(report) => report,
        other => panic!("expected a merge, got {:?}", other),
    };
    assert_eq!(report.stats.files, 1);
    let merge = fx.root.join("Root").join("Merge");
    assert_eq!(read(merge.join("ok.md")), "ok");
    assert_eq!(fs::read_dir(&merge).unwrap().count(), 1);
}
