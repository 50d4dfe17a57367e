//! ConfigLoader facade delegating to the layering service.

use super::layering::service::LayeringService;
use super::BranchfoldConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace from files and environment.
    pub fn load(workspace_root: &Path) -> Result<BranchfoldConfig, ConfigError> {
        LayeringService::load(workspace_root)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<BranchfoldConfig, ConfigError> {
        LayeringService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> BranchfoldConfig {
        BranchfoldConfig::default()
    }
}
