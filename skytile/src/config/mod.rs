//! Configuration file management.
//!
//! Settings live in `~/.skytile/config.ini`:
//!
//! ```ini
//! [fetch]
//! zoom = 9
//! lookback_days = 80
//! attempt_timeout_secs = 15
//!
//! [travel]
//! interval_secs = 3
//! step_degrees = 1.0
//! history_size = 16
//! cell_size = 256
//! output = skytile-grid.png
//!
//! [logging]
//! level = info
//! directory =
//! ```
//!
//! Every key is optional. CLI arguments override file values when given.

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::history::{DEFAULT_CELL_SIZE, DEFAULT_HISTORY_SIZE};
use crate::logging::LoggingConfig;
use crate::picture::{FetchOptions, DEFAULT_LOOKBACK_DAYS, DEFAULT_ZOOM};
use crate::resolver::DEFAULT_ATTEMPT_TIMEOUT;
use crate::travel::DEFAULT_STEP_DEGREES;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".skytile";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default interval between travel steps in seconds.
pub const DEFAULT_TRAVEL_INTERVAL_SECS: u64 = 3;

/// Default grid image written by the travel command.
pub const DEFAULT_GRID_OUTPUT: &str = "skytile-grid.png";

/// Errors from loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: ini::Error },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// `[fetch]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub zoom: i32,
    pub lookback_days: u32,
    /// Per-candidate timeout; 0 disables it.
    pub attempt_timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT.as_secs(),
        }
    }
}

impl FetchSettings {
    pub fn options(&self) -> FetchOptions {
        FetchOptions::default()
            .with_zoom(self.zoom)
            .with_lookback_days(self.lookback_days)
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        match self.attempt_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// `[travel]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelSettings {
    pub interval_secs: u64,
    pub step_degrees: f64,
    pub history_size: usize,
    pub cell_size: u32,
    pub output: PathBuf,
}

impl Default for TravelSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_TRAVEL_INTERVAL_SECS,
            step_degrees: DEFAULT_STEP_DEGREES,
            history_size: DEFAULT_HISTORY_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            output: PathBuf::from(DEFAULT_GRID_OUTPUT),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub fetch: FetchSettings,
    pub travel: TravelSettings,
    pub logging: LoggingConfig,
}

/// Path of the per-user configuration file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDirectory)
}

impl ConfigFile {
    /// Loads the per-user configuration, or defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Builds a configuration from parsed INI data.
    ///
    /// Unknown sections and keys are ignored; known keys are validated.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Renders the configuration as INI data.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Saves to the per-user configuration path, creating its directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Saves to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }
}
