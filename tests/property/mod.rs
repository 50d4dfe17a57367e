//! Property-based tests for branch classification and overlay ordering

mod branch_names;
mod overlay;
