//! Well-known configuration locations.

use std::path::{Path, PathBuf};

/// Per-workspace state folder, ignored by the watcher
pub const WORKSPACE_STATE_DIR: &str = ".branchfold";

/// Global config file: $XDG_CONFIG_HOME/branchfold/config.toml, else ~/.config/branchfold/config.toml
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("branchfold").join("config.toml"));
        }
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("branchfold")
            .join("config.toml")
    })
}

/// Workspace config file, edited by hand
pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_STATE_DIR).join("config.toml")
}

/// Workspace settings file, rewritten on every settings change
pub fn workspace_settings_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_STATE_DIR).join("settings.toml")
}
