//! CLI command implementations.

pub mod nodes;
pub mod render;
