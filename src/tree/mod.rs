//! Merge Tree
//!
//! The in-memory overlay of branch folders, how it is built from a tree store
//! and how it is written back.

pub mod builder;
pub mod materialize;
pub mod node;

pub use builder::TreeBuilder;
pub use materialize::{materialize, MaterializeStats};
pub use node::{MergeFile, MergeFolder, MergeNode, MergeNodeRef};
