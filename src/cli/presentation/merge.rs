//! Merge presentation: merge outcomes and branch listings.

use super::to_json;
use crate::branch::{format_branch_name, Branch, BRANCH_LABEL_SEPARATOR};
use crate::error::MergeError;
use crate::merge::MergeOutcome;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;
use std::path::Path;

pub fn format_merge_outcome(
    outcome: &MergeOutcome,
    folder: &Path,
    format: &str,
) -> Result<String, MergeError> {
    if format == "json" {
        return to_json(outcome);
    }
    Ok(match outcome {
        MergeOutcome::Merged(report) => {
            let mut s = format!(
                "Merged {} branches into {}\n  Folders: {}\n  Files: {}",
                report.branch_count,
                report.output.display(),
                report.stats.folders,
                report.stats.files
            );
            if report.replaced_previous {
                s.push_str("\n  Previous merge replaced");
            }
            s
        }
        MergeOutcome::AlreadyMerging => "Merge skipped: another merge is running.".to_string(),
        MergeOutcome::NoBranches => format!("No branches found in {}.", folder.display()),
    })
}

/// Branches are expected in merge order
pub fn format_branches(folder: &Path, branches: &[Branch], format: &str) -> Result<String, MergeError> {
    if format == "json" {
        let rows: Vec<serde_json::Value> = branches
            .iter()
            .enumerate()
            .map(|(i, b)| {
                json!({
                    "order": i + 1,
                    "name": b.name(),
                    "date": b.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "path": b.path,
                })
            })
            .collect();
        return to_json(&json!({ "folder": folder, "branches": rows }));
    }

    if branches.is_empty() {
        return Ok(format!("No branches found in {}.", folder.display()));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Branch", "Date", "Label"]);
    for (i, branch) in branches.iter().enumerate() {
        let name = branch.name();
        let label = name
            .strip_prefix(format_branch_name(&name))
            .and_then(|rest| rest.strip_prefix(BRANCH_LABEL_SEPARATOR))
            .unwrap_or("-")
            .to_string();
        table.add_row(vec![
            (i + 1).to_string(),
            name.clone(),
            branch.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            label,
        ]);
    }
    Ok(format!("Branches in {} (merge order):\n{}", folder.display(), table))
}
