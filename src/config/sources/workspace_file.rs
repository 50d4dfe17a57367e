//! Workspace sources: .branchfold/config.toml then .branchfold/settings.toml

use crate::config::paths::{workspace_config_path, workspace_settings_path};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Add workspace config files to builder.
/// The persisted settings file is layered over the hand-edited config file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder;

    for path in [
        workspace_config_path(workspace_root),
        workspace_settings_path(workspace_root),
    ] {
        if path.exists() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }
    }

    Ok(builder)
}
