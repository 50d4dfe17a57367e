//! Settings presentation: effective merge settings.

use super::to_json;
use crate::config::MergeSettings;
use crate::error::MergeError;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;
use std::path::Path;

pub fn format_settings(
    settings: &MergeSettings,
    settings_path: &Path,
    format: &str,
) -> Result<String, MergeError> {
    if format == "json" {
        return to_json(&json!({
            "merge_name": settings.merge_name,
            "auto_merge": settings.auto_merge,
            "settings_file": settings_path,
        }));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["merge-name", settings.merge_name.as_str()]);
    table.add_row(vec!["auto-merge", settings.auto_merge.as_str()]);
    Ok(format!("{}\nSettings file: {}", table, settings_path.display()))
}
