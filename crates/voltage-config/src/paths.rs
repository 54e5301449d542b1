//! Platform-specific configuration paths.
//!
//! - **User config**: `~/.config/voltage/` (Linux), `~/Library/Application Support/voltage/` (macOS), `%APPDATA%\voltage\` (Windows)
//! - **Engine settings**: `config.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use voltage_config::paths;
//!
//! println!("Settings file: {:?}", paths::default_config_path());
//! ```

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "voltage";

/// File name of the engine settings.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the engine settings file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_named_after_app() {
        let dir = user_config_dir();
        assert!(dir.to_string_lossy().contains("voltage"));
    }

    #[test]
    fn settings_file_inside_config_dir() {
        let path = default_config_path();
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
    }
}
