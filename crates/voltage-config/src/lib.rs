//! Engine configuration for voltage patches.
//!
//! Hosts read the sample rate and block size from a TOML file, validate them
//! and turn them into a [`ProcessContext`](voltage_core::ProcessContext).
//!
//! # Features
//!
//! - **Engine settings**: [`EngineConfig`] with serde defaults
//! - **Validation**: range checks reporting every problem at once
//! - **Paths**: platform-specific location of the settings file
//!
//! # Example
//!
//! ```rust
//! use voltage_config::EngineConfig;
//!
//! let config = EngineConfig::from_toml("sample_rate = 44100.0").unwrap();
//! assert_eq!(config.block_size, 256);
//!
//! let ctx = config.context().unwrap();
//! assert_eq!(ctx.sample_rate(), 44100.0);
//! ```

mod engine;
mod error;

/// Platform-specific paths for configuration.
pub mod paths;

/// Engine setting validation.
pub mod validation;

pub use engine::{DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE, EngineConfig};
pub use error::ConfigError;
pub use paths::{default_config_path, user_config_dir};
pub use validation::{
    MAX_BLOCK_SIZE, MAX_SAMPLE_RATE, MIN_BLOCK_SIZE, ValidationError, ValidationResult,
    validate_block_size, validate_engine_config, validate_sample_rate,
};
