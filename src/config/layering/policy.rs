//! Layering rules: built-in defaults under every other source.

use crate::config::DEFAULT_MERGE_NAME;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("merge.merge_name", DEFAULT_MERGE_NAME)?
        .set_default("merge.auto_merge", "no")
}
