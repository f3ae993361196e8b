//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::history::{MAX_CELL_SIZE, MAX_HISTORY_SIZE};

/// A single setting in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    FetchZoom,
    FetchLookbackDays,
    FetchAttemptTimeoutSecs,
    TravelIntervalSecs,
    TravelStepDegrees,
    TravelHistorySize,
    TravelCellSize,
    TravelOutput,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 10] = [
    ConfigKey::FetchZoom,
    ConfigKey::FetchLookbackDays,
    ConfigKey::FetchAttemptTimeoutSecs,
    ConfigKey::TravelIntervalSecs,
    ConfigKey::TravelStepDegrees,
    ConfigKey::TravelHistorySize,
    ConfigKey::TravelCellSize,
    ConfigKey::TravelOutput,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            Self::FetchZoom | Self::FetchLookbackDays | Self::FetchAttemptTimeoutSecs => "fetch",
            Self::TravelIntervalSecs
            | Self::TravelStepDegrees
            | Self::TravelHistorySize
            | Self::TravelCellSize
            | Self::TravelOutput => "travel",
            Self::LoggingLevel | Self::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            Self::FetchZoom => "zoom",
            Self::FetchLookbackDays => "lookback_days",
            Self::FetchAttemptTimeoutSecs => "attempt_timeout_secs",
            Self::TravelIntervalSecs => "interval_secs",
            Self::TravelStepDegrees => "step_degrees",
            Self::TravelHistorySize => "history_size",
            Self::TravelCellSize => "cell_size",
            Self::TravelOutput => "output",
            Self::LoggingLevel => "level",
            Self::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written in the file. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::FetchZoom => config.fetch.zoom.to_string(),
            Self::FetchLookbackDays => config.fetch.lookback_days.to_string(),
            Self::FetchAttemptTimeoutSecs => config.fetch.attempt_timeout_secs.to_string(),
            Self::TravelIntervalSecs => config.travel.interval_secs.to_string(),
            Self::TravelStepDegrees => config.travel.step_degrees.to_string(),
            Self::TravelHistorySize => config.travel.history_size.to_string(),
            Self::TravelCellSize => config.travel.cell_size.to_string(),
            Self::TravelOutput => config.travel.output.display().to_string(),
            Self::LoggingLevel => config.logging.level.clone(),
            Self::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parses and stores `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            Self::FetchZoom => config.fetch.zoom = self.parse(value)?,
            Self::FetchLookbackDays => config.fetch.lookback_days = self.parse(value)?,
            Self::FetchAttemptTimeoutSecs => config.fetch.attempt_timeout_secs = self.parse(value)?,
            Self::TravelIntervalSecs => {
                let secs: u64 = self.parse(value)?;
                if secs == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.travel.interval_secs = secs;
            }
            Self::TravelStepDegrees => {
                let step: f64 = self.parse(value)?;
                if !step.is_finite() || step < 0.0 {
                    return Err(self.invalid(value, "must be a non-negative number"));
                }
                config.travel.step_degrees = step;
            }
            Self::TravelHistorySize => {
                let size: usize = self.parse(value)?;
                if !(1..=MAX_HISTORY_SIZE).contains(&size) {
                    let reason = format!("must be between 1 and {}", MAX_HISTORY_SIZE);
                    return Err(self.invalid(value, &reason));
                }
                config.travel.history_size = size;
            }
            Self::TravelCellSize => {
                let size: u32 = self.parse(value)?;
                if !(1..=MAX_CELL_SIZE).contains(&size) {
                    let reason = format!("must be between 1 and {}", MAX_CELL_SIZE);
                    return Err(self.invalid(value, &reason));
                }
                config.travel.cell_size = size;
            }
            Self::TravelOutput => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.travel.output = PathBuf::from(value);
            }
            Self::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected one of error, warn, info, debug, trace"));
                }
                config.logging.level = level;
            }
            Self::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    fn parse<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| self.invalid(value, &e.to_string()))
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!("fetch.zoom".parse::<ConfigKey>().unwrap(), ConfigKey::FetchZoom);
        assert_eq!(
            "logging.directory".parse::<ConfigKey>().unwrap(),
            ConfigKey::LoggingDirectory
        );
        assert!("fetch.bogus".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_every_key_roundtrips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();
        ConfigKey::FetchLookbackDays.set(&mut config, " 30 ").unwrap();
        ConfigKey::LoggingLevel.set(&mut config, "DEBUG").unwrap();

        assert_eq!(ConfigKey::FetchLookbackDays.get(&config), "30");
        assert_eq!(ConfigKey::LoggingLevel.get(&config), "debug");
    }

    #[test]
    fn test_negative_zoom_is_accepted_and_clamped_later() {
        let mut config = ConfigFile::default();
        ConfigKey::FetchZoom.set(&mut config, "-2").unwrap();
        assert_eq!(config.fetch.zoom, -2);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::TravelIntervalSecs.set(&mut config, "0").is_err());
        assert!(ConfigKey::TravelStepDegrees.set(&mut config, "-1").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "loud").is_err());
        assert!(ConfigKey::FetchLookbackDays.set(&mut config, "-5").is_err());
    }

    #[test]
    fn test_grid_sizes_are_bounded() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::TravelCellSize.set(&mut config, "4294967295").is_err());
        assert!(ConfigKey::TravelCellSize.set(&mut config, "2049").is_err());
        assert!(ConfigKey::TravelHistorySize.set(&mut config, "65").is_err());

        ConfigKey::TravelCellSize.set(&mut config, "2048").unwrap();
        ConfigKey::TravelHistorySize.set(&mut config, "64").unwrap();
        assert_eq!(config.travel.cell_size, 2048);
        assert_eq!(config.travel.history_size, 64);
    }

    #[test]
    fn test_empty_directory_unsets() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingDirectory.set(&mut config, "/tmp/logs").unwrap();
        assert!(config.logging.directory.is_some());

        ConfigKey::LoggingDirectory.set(&mut config, "").unwrap();
        assert!(config.logging.directory.is_none());
        assert_eq!(ConfigKey::LoggingDirectory.get(&config), "");
    }
}
