//! branchfold: Chronological Overlay of Dated Branch Folders
//!
//! Folders whose names start with a date ("2024-01-05 - notes") are branches
//! of the same content. Merging a folder overlays its branches oldest first
//! into a merge folder next to them, later branches winning file by file.
//! Merges can be run by hand or triggered by filesystem changes.

pub mod auto;
pub mod branch;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod notice;
pub mod store;
pub mod tree;
pub mod watch;
