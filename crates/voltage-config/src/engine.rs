//! Engine settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use voltage_core::ProcessContext;

use crate::error::ConfigError;
use crate::paths;
use crate::validation::validate_engine_config;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Default block size in samples.
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Settings a host needs to run a patch.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 44100.0
/// block_size = 128
/// ```
///
/// Missing fields take their defaults (48000 Hz, 256 samples).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,

    /// Samples processed per tick.
    pub block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl EngineConfig {
    /// Create a configuration. Not validated until [`validate`](Self::validate)
    /// or [`context`](Self::context) is called.
    pub fn new(sample_rate: f64, block_size: usize) -> Self {
        Self {
            sample_rate,
            block_size,
        }
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Load the configuration at `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file at an explicit path is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = paths::default_config_path();
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engine_config(self)?;
        Ok(())
    }

    /// Build a [`ProcessContext`] from these settings.
    pub fn context(&self) -> Result<ProcessContext, ConfigError> {
        self.validate()?;
        Ok(ProcessContext::new(self.sample_rate, self.block_size)?)
    }

    /// Duration of one block in seconds.
    pub fn block_duration(&self) -> f64 {
        self.block_size as f64 / self.sample_rate
    }

    /// Number of blocks needed to cover `seconds` of audio, rounded up.
    pub fn blocks_for(&self, seconds: f64) -> usize {
        let samples = (seconds.max(0.0) * self.sample_rate).ceil() as usize;
        samples.div_ceil(self.block_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.block_size, 256);
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::new(44100.0, 128);
        let text = config.to_toml().unwrap();
        assert!(text.contains("sample_rate = 44100.0"), "got: {text}");
        assert!(text.contains("block_size = 128"), "got: {text}");
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_toml("block_size = 64").unwrap();
        assert_eq!(config, EngineConfig::default().with_block_size(64));
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn invalid_values_rejected_on_parse() {
        let err = EngineConfig::from_toml("block_size = 100000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::BlockSize(100000))
        ));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = EngineConfig::from_toml("sample_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn context_matches_settings() {
        let ctx = EngineConfig::new(96000.0, 32).context().unwrap();
        assert_eq!(ctx.sample_rate(), 96000.0);
        assert_eq!(ctx.block_size(), 32);
        assert!(EngineConfig::new(48000.0, 0).context().is_err());
    }

    #[test]
    fn block_arithmetic() {
        let config = EngineConfig::new(48000.0, 256);
        assert!((config.block_duration() - 256.0 / 48000.0).abs() < 1e-12);
        assert_eq!(config.blocks_for(1.0), 188);
        assert_eq!(config.blocks_for(0.0), 0);
        assert_eq!(config.blocks_for(-3.0), 0);
    }
}
