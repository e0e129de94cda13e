//! core::config::schema
//!
//! User settings schema.
//!
//! Located at (in order of precedence):
//! 1. `$TMOD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tmod/config.toml`
//! 3. `~/.tmod/config.toml` (canonical write location)
//!
//! ```toml
//! api_base = "https://api.curseforge.com/v1"
//! api_key = "..."
//! out_dir = "mods"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User-level settings. Every field is optional; accessors on
/// [`super::Settings`] supply defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Registry API base URL
    pub api_base: Option<String>,

    /// Registry API key
    pub api_key: Option<String>,

    /// Default directory for `tmod install`
    pub out_dir: Option<PathBuf>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    base
                )));
            }
        }

        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "api_key cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
