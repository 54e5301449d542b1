//! Engine setting validation.
//!
//! Sample rate and block size are checked against the ranges a host can
//! realistically run. Every problem is reported, not just the first.
//!
//! # Example
//!
//! ```rust
//! use voltage_config::{EngineConfig, ValidationError, validate_engine_config};
//!
//! assert!(validate_engine_config(&EngineConfig::default()).is_ok());
//!
//! let bad = EngineConfig::new(0.0, 256);
//! assert_eq!(
//!     validate_engine_config(&bad),
//!     Err(ValidationError::SampleRate(0.0))
//! );
//! ```

use thiserror::Error;

use crate::engine::EngineConfig;

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: f64 = 384_000.0;

/// Smallest accepted block size.
pub const MIN_BLOCK_SIZE: usize = 1;

/// Largest accepted block size.
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sample rate not in (0, 384000].
    #[error("sample rate {0} Hz out of range (0, 384000]")]
    SampleRate(f64),

    /// Block size not in [1, 8192].
    #[error("block size {0} out of range [1, 8192]")]
    BlockSize(usize),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a sample rate: finite, positive and at most [`MAX_SAMPLE_RATE`].
pub fn validate_sample_rate(sample_rate: f64) -> ValidationResult<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate <= MAX_SAMPLE_RATE {
        Ok(())
    } else {
        Err(ValidationError::SampleRate(sample_rate))
    }
}

/// Checks a block size against [`MIN_BLOCK_SIZE`]..=[`MAX_BLOCK_SIZE`].
pub fn validate_block_size(block_size: usize) -> ValidationResult<()> {
    if (MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
        Ok(())
    } else {
        Err(ValidationError::BlockSize(block_size))
    }
}

/// Validates every field of an engine configuration.
///
/// A single problem is returned as-is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_engine_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = [
        validate_sample_rate(config.sample_rate),
        validate_block_size(config.block_size),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
