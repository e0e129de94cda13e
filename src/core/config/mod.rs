//! core::config
//!
//! User settings: where the registry lives, which key to use, where to
//! install by default.
//!
//! The per-repository target (game version and loader) is not a setting;
//! it lives in the repository itself, see
//! [`crate::core::repository::Configuration`].
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Settings file
//! 3. `TMOD_API_KEY` environment variable (API key only)
//! 4. CLI flags (not handled here)
//!
//! # Settings File Locations
//!
//! Searched in order:
//! 1. `$TMOD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tmod/config.toml`
//! 3. `~/.tmod/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use tmod::core::config::Settings;
//!
//! let settings = Settings::load().unwrap();
//! println!("Registry: {}", settings.api_base());
//! ```

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::DEFAULT_MODS_DIR;

/// Public CurseForge API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.curseforge.com/v1";

/// Key shared by third-party launchers for the public CurseForge API.
pub const DEFAULT_API_KEY: &str = "$2a$10$bL4bIL5pUWqfcO7KQtnMReakwtfHbNKh6v1uTpKlzhwoueEJQnPnm";

/// Environment variable overriding the API key.
pub const API_KEY_ENV: &str = "TMOD_API_KEY";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Resolved user settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Values read from the settings file
    pub global: GlobalConfig,
    /// API key from the environment, if set
    env_api_key: Option<String>,
    /// Path the settings were loaded from
    loaded_from: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default locations and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be parsed.
    /// A missing file is not an error (defaults are used).
    pub fn load() -> Result<Self, ConfigError> {
        let (global, loaded_from) = Self::load_global()?;
        global.validate()?;

        let env_api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            global,
            env_api_key,
            loaded_from,
        })
    }

    /// Load settings from an explicit file, ignoring the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let global = Self::read_global_config(path)?;
        global.validate()?;
        Ok(Self {
            global,
            env_api_key: None,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $TMOD_CONFIG
        if let Ok(path) = std::env::var("TMOD_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/tmod/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("tmod/config.toml");
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.tmod/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".tmod/config.toml");
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    fn read_global_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the settings file.
    ///
    /// Returns `~/.tmod/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".tmod/config.toml"))
    }

    /// Write settings atomically (temp file, then rename).
    pub fn write_global_to(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Registry API base URL, without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.global
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Registry API key. The environment wins over the settings file.
    pub fn api_key(&self) -> &str {
        self.env_api_key
            .as_deref()
            .or(self.global.api_key.as_deref())
            .unwrap_or(DEFAULT_API_KEY)
    }

    /// Default install directory.
    pub fn out_dir(&self) -> PathBuf {
        self.global
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODS_DIR))
    }

    /// Get the path the settings were loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let settings = Settings::default();

        assert_eq!(settings.api_base(), DEFAULT_API_BASE);
        assert_eq!(settings.api_key(), DEFAULT_API_KEY);
        assert_eq!(settings.out_dir(), PathBuf::from("mods"));
        assert!(settings.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            api_base = "http://127.0.0.1:9000/v1/"
            api_key = "local-key"
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.api_base(), "http://127.0.0.1:9000/v1");
        assert_eq!(settings.api_key(), "local-key");
        assert_eq!(settings.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let settings = Settings {
            global: GlobalConfig {
                api_key: Some("from-file".into()),
                ..Default::default()
            },
            env_api_key: Some("from-env".into()),
            loaded_from: None,
        };

        assert_eq!(settings.api_key(), "from-env");
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "api_key = \"k\"\nunknown_field = true\n").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");
        let config = GlobalConfig {
            out_dir: Some(PathBuf::from("instance/mods")),
            ..Default::default()
        };

        Settings::write_global_to(&path, &config).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.out_dir(), PathBuf::from("instance/mods"));
        assert!(!path.with_extension("toml.tmp").exists());
    }
}
