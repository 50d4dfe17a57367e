//! Persistence of the merge settings into the workspace settings file.

use super::paths::workspace_settings_path;
use super::MergeSettings;
use crate::error::MergeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct PersistedSettings<'a> {
    merge: &'a MergeSettings,
}

#[derive(Deserialize)]
struct LoadedSettings {
    #[serde(default)]
    merge: MergeSettings,
}

/// Writes `[merge]` settings to `<workspace>/.branchfold/settings.toml`
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn for_workspace(workspace_root: &Path) -> Self {
        Self {
            path: workspace_settings_path(workspace_root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted settings, falling back to defaults when the file is absent
    pub fn load(&self) -> Result<MergeSettings, MergeError> {
        if !self.path.exists() {
            return Ok(MergeSettings::default());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            MergeError::ConfigError(format!(
                "Failed to read settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let loaded: LoadedSettings = toml::from_str(&content).map_err(|e| {
            MergeError::ConfigError(format!(
                "Failed to parse settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        loaded.merge.validate().map_err(MergeError::ConfigError)?;
        Ok(loaded.merge)
    }

    /// Persist the whole settings record, replacing any previous file
    pub fn save(&self, settings: &MergeSettings) -> Result<(), MergeError> {
        settings.validate().map_err(MergeError::ConfigError)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MergeError::ConfigError(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(&PersistedSettings { merge: settings })
            .map_err(|e| MergeError::ConfigError(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            MergeError::ConfigError(format!(
                "Failed to write settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        info!(
            settings_path = %self.path.display(),
            merge_name = %settings.merge_name,
            auto_merge = %settings.auto_merge,
            "Settings saved"
        );
        Ok(())
    }
}
