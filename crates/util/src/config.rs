//! Viewer configuration.
//!
//! A small JSON file (`~/.config/rview/config.json` on most platforms, or the
//! path in `RVIEW_CONFIG_PATH`) holding UI preferences. A missing file yields
//! the defaults; a file that cannot be parsed is reported and ignored so a
//! typo never prevents the viewer from starting.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "RVIEW_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_FLASH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_PAGES: usize = 16;

/// Error surfaced when reading the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Viewer settings read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Identifier of the color theme (`dracula`, `nord`).
    pub theme: Option<String>,
    /// How long a notification stays in the flash bar.
    pub flash_timeout_secs: u64,
    /// Maximum number of pages on the view stack.
    pub max_pages: usize,
    /// Whether live views start with soft wrapping enabled.
    pub wrap_values: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            theme: None,
            flash_timeout_secs: DEFAULT_FLASH_TIMEOUT_SECS,
            max_pages: DEFAULT_MAX_PAGES,
            wrap_values: false,
        }
    }
}

impl ViewerConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Loads the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => Ok(config),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }
}

/// Resolves the config file path, honouring `RVIEW_CONFIG_PATH`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rview")
        .join(CONFIG_FILE_NAME)
}
