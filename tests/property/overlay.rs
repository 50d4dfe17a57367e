//! Overlay ordering properties

use branchfold::store::MemoryTreeStore;
use branchfold::tree::{MergeNodeRef, TreeBuilder};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

proptest! {
    #[test]
    fn latest_branch_provides_shared_file(offsets in proptest::collection::btree_set(0i64..3650, 1..8)) {
        let offsets: BTreeSet<i64> = offsets;
        let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let store = MemoryTreeStore::new("/vault");
        for offset in &offsets {
            let date = base + Duration::days(*offset);
            let path = format!("/vault/{} - b{}/shared.md", date.format("%Y-%m-%d"), offset);
            store.write_file(&path, offset.to_string()).unwrap();
        }

        let builder = TreeBuilder::new(&store, "Merge");
        let mut branches = builder.fetch_branches(Path::new("/vault")).unwrap();
        // Scan order must not matter
        branches.reverse();
        let tree = builder.build_merge_tree(branches).unwrap();

        let latest = *offsets.iter().next_back().unwrap();
        let date = base + Duration::days(latest);
        let expected = PathBuf::from(format!(
            "/vault/{} - b{}/shared.md",
            date.format("%Y-%m-%d"),
            latest
        ));
        match tree.get("shared.md") {
            Some(MergeNodeRef::File(file)) => prop_assert_eq!(file.source(), expected.as_path()),
            _ => prop_assert!(false, "shared.md missing from the merge"),
        }
    }
}
