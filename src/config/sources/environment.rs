//! Environment variable source: BRANCHFOLD prefix with __ separator

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

/// Add environment variable overlay to builder.
/// `BRANCHFOLD__MERGE__MERGE_NAME=Out` sets `merge.merge_name`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("BRANCHFOLD")
            .separator("__")
            .try_parsing(true),
    ))
}
