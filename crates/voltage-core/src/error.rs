//! Error types for patch construction.
//!
//! The per-sample path never fails; everything here is reported while a patch
//! is being built or rewired.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use thiserror::Error;

/// Errors raised while building or rewiring a patch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// A node was asked to bind an input role it does not have.
    #[error("node '{node}' has no input named '{input}'")]
    UnknownInput {
        /// Name of the node type.
        node: &'static str,
        /// The role name that was requested.
        input: String,
    },

    /// The sample rate must be finite and positive.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// The block size must be at least one sample.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(usize),
}

impl PatchError {
    /// Create an unknown input error.
    pub fn unknown_input(node: &'static str, input: impl Into<String>) -> Self {
        PatchError::UnknownInput {
            node,
            input: input.into(),
        }
    }
}
