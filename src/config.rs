//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, the
//! workspace config file, the workspace's persisted settings and finally
//! `BRANCHFOLD__*` environment variables. The merge settings can be changed at
//! runtime and are persisted wholesale on every change.

use crate::branch::is_branch;
use crate::error::MergeError;
use crate::logging::LoggingConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod facade;
mod layering;
mod paths;
mod settings_store;
mod sources;

pub use facade::ConfigLoader;
pub use paths::{global_config_path, workspace_config_path, workspace_settings_path};
pub use settings_store::SettingsStore;

/// Default name of the generated merge folder
pub const DEFAULT_MERGE_NAME: &str = "Merge";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchfoldConfig {
    /// Merge settings
    #[serde(default)]
    pub merge: MergeSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Whether tree mutations trigger merges, and whether a notice is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoMergeMode {
    /// Merge automatically and show a notice
    Yes,
    /// Merge automatically without a notice
    Silently,
    /// Never merge automatically
    #[default]
    No,
}

impl AutoMergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoMergeMode::Yes => "yes",
            AutoMergeMode::Silently => "silently",
            AutoMergeMode::No => "no",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != AutoMergeMode::No
    }
}

impl fmt::Display for AutoMergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoMergeMode {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(AutoMergeMode::Yes),
            "silently" => Ok(AutoMergeMode::Silently),
            "no" => Ok(AutoMergeMode::No),
            other => Err(MergeError::ConfigError(format!(
                "Invalid auto merge mode: {} (must be 'yes', 'silently' or 'no')",
                other
            ))),
        }
    }
}

/// The two user-facing merge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Name of the merge folder created next to the branches
    #[serde(default = "default_merge_name")]
    pub merge_name: String,

    /// Automatic merge mode
    #[serde(default)]
    pub auto_merge: AutoMergeMode,
}

fn default_merge_name() -> String {
    DEFAULT_MERGE_NAME.to_string()
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            merge_name: default_merge_name(),
            auto_merge: AutoMergeMode::default(),
        }
    }
}

/// A settable merge setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    MergeName,
    AutoMerge,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::MergeName => "merge-name",
            SettingKey::AutoMerge => "auto-merge",
        }
    }
}

impl FromStr for SettingKey {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "merge-name" => Ok(SettingKey::MergeName),
            "auto-merge" => Ok(SettingKey::AutoMerge),
            other => Err(MergeError::ConfigError(format!(
                "Unknown setting: {} (must be 'merge-name' or 'auto-merge')",
                other
            ))),
        }
    }
}

impl MergeSettings {
    /// Validate merge settings
    pub fn validate(&self) -> Result<(), String> {
        if self.merge_name.trim().is_empty() {
            return Err("Merge name cannot be empty".to_string());
        }
        if self.merge_name.contains('/') || self.merge_name.contains('\\') {
            return Err(format!(
                "Merge name '{}' cannot contain a path separator",
                self.merge_name
            ));
        }
        if self.merge_name == "." || self.merge_name == ".." {
            return Err(format!("Merge name '{}' is not a folder name", self.merge_name));
        }
        if is_branch(&self.merge_name) {
            return Err(format!(
                "Merge name '{}' reads as a branch date and would be merged into itself",
                self.merge_name
            ));
        }
        Ok(())
    }

    /// Apply one setting change, validating the result. Leaves `self` untouched on error.
    pub fn apply(&mut self, key: SettingKey, value: &str) -> Result<(), MergeError> {
        let mut updated = self.clone();
        match key {
            SettingKey::MergeName => updated.merge_name = value.to_string(),
            SettingKey::AutoMerge => updated.auto_merge = value.parse()?,
        }
        updated.validate().map_err(MergeError::ConfigError)?;
        *self = updated;
        Ok(())
    }
}

/// Merge settings shared between the orchestrator, the policy and the settings surface
pub type SharedSettings = Arc<RwLock<MergeSettings>>;

/// Wrap settings for sharing
pub fn shared(settings: MergeSettings) -> SharedSettings {
    Arc::new(RwLock::new(settings))
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Merge(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Merge(msg) => write!(f, "Merge: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BranchfoldConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.merge.validate() {
            errors.push(ValidationError::Merge(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and turn the error list into a single configuration error
    pub fn ensure_valid(&self) -> Result<(), MergeError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            MergeError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })
    }
}
