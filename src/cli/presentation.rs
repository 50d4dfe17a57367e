//! CLI presentation: text and json formatters per command family.

mod merge;
mod settings;

pub use merge::{format_branches, format_merge_outcome};
pub use settings::format_settings;

use crate::error::MergeError;
use serde::Serialize;

fn to_json<T: Serialize>(value: &T) -> Result<String, MergeError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MergeError::ConfigError(format!("Failed to serialize output: {}", e)))
}
