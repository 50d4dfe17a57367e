//! CLI parse: clap types for branchfold. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// branchfold - Overlay dated branch folders into a merge folder
#[derive(Parser)]
#[command(name = "branchfold")]
#[command(about = "Overlay dated branch folders chronologically into a single merge folder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the branches of a folder (default: the workspace root)
    Merge {
        /// Folder whose branch children are merged, relative to the workspace
        folder: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Watch the workspace and merge automatically on changes
    Watch {
        /// Debounce window in milliseconds
        #[arg(long, default_value = "100")]
        debounce_ms: u64,
        /// Batch window in milliseconds
        #[arg(long, default_value = "50")]
        batch_window_ms: u64,
    },
    /// List the branches of a folder in merge order
    Branches {
        /// Folder to inspect, relative to the workspace
        folder: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show or change merge settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective merge settings
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Change one setting and persist it for the workspace
    Set {
        /// Setting name: merge-name or auto-merge
        key: String,
        /// New value (auto-merge: yes, silently or no)
        value: String,
    },
}
