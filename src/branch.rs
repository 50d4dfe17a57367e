//! Branch classification
//!
//! A folder is a branch when its name, cut at the first `" - "`, parses as a
//! date. The parsed date orders sibling branches for the overlay.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};

/// Separator between the date part of a branch name and its free-form label
pub const BRANCH_LABEL_SEPARATOR: &str = " - ";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// A folder classified as a branch, paired with its parsed date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub date: NaiveDateTime,
    pub path: PathBuf,
}

impl Branch {
    /// Classify a folder path by its final component.
    pub fn classify(path: &Path) -> Option<Branch> {
        let name = path.file_name()?.to_str()?;
        branch_date(name).map(|date| Branch {
            date,
            path: path.to_path_buf(),
        })
    }

    /// Folder name of the branch
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Strip the label suffix that starts at the first `" - "`.
pub fn format_branch_name(name: &str) -> &str {
    match name.find(BRANCH_LABEL_SEPARATOR) {
        Some(index) => &name[..index],
        None => name,
    }
}

/// Parse the date encoded in a folder name. `None` when the name is not a branch.
pub fn branch_date(name: &str) -> Option<NaiveDateTime> {
    parse_date(format_branch_name(name).trim())
}

/// Whether a folder name encodes a branch
pub fn is_branch(name: &str) -> bool {
    branch_date(name).is_some()
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    // Year-month and bare year resolve to the first day of the period
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('-') {
        Some((year, month)) if year.len() == 4 && month.len() == 2 => {
            if !is_digits(year) || !is_digits(month) {
                return None;
            }
            let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
            Some(date.and_time(NaiveTime::MIN))
        }
        None if text.len() == 4 && is_digits(text) => {
            let date = NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)?;
            Some(date.and_time(NaiveTime::MIN))
        }
        _ => None,
    }
}
