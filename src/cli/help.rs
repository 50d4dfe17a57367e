//! CLI help and command-name contract for logging.

use crate::cli::parse::{Commands, ConfigCommands};

/// Command name string for log records (e.g. "merge", "config.set").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Merge { .. } => "merge".to_string(),
        Commands::Watch { .. } => "watch".to_string(),
        Commands::Branches { .. } => "branches".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show { .. } => "show",
        ConfigCommands::Set { .. } => "set",
    }
}
