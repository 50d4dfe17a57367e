//! Branch name classification properties

use branchfold::branch::{branch_date, format_branch_name, is_branch, BRANCH_LABEL_SEPARATOR};
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

proptest! {
    #[test]
    fn cut_name_is_a_prefix_without_separator(name in ".{0,40}") {
        let cut = format_branch_name(&name);
        prop_assert!(name.starts_with(cut));
        prop_assert!(!cut.contains(BRANCH_LABEL_SEPARATOR));
    }

    #[test]
    fn dated_names_are_branches_whatever_the_label(
        year in 1000i32..=9999,
        month in 1u32..=12,
        day in 1u32..=28,
        label in ".{0,30}",
    ) {
        let name = format!("{:04}-{:02}-{:02}{}{}", year, month, day, BRANCH_LABEL_SEPARATOR, label);
        let expected = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN);
        prop_assert_eq!(branch_date(&name), Some(expected));
        prop_assert!(is_branch(&name));
    }

    #[test]
    fn letter_only_names_are_never_branches(name in "[A-Za-z ]{0,24}") {
        prop_assert!(!is_branch(&name));
    }
}
