//! Source layering: defaults, override order and deserialization.

pub mod policy;
pub mod service;
