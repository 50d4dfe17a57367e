//! LayeringService: orchestrates sources, applies defaults, deserializes to BranchfoldConfig.

use super::policy;
use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::BranchfoldConfig;
use config::{ConfigError, File};
use std::path::Path;

/// Layering service for config composition.
pub struct LayeringService;

impl LayeringService {
    /// Load config from workspace and standard sources.
    /// Precedence: defaults (lowest) -> global file -> workspace config ->
    /// workspace settings -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<BranchfoldConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<BranchfoldConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
