//! Integration tests for branchfold

mod auto_merge;
mod cli_binary;
mod config_integration;
mod merge_scenarios;
mod test_utils;

pub use test_utils::{with_xdg_env, write_file};
