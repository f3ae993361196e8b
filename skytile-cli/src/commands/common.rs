//! Common argument groups and helpers shared across CLI commands.

use std::time::Duration;

use clap::Args;
use skytile::config::ConfigFile;
use skytile::picture::{FetchOptions, TilePictureFetcher};
use skytile::provider::AsyncReqwestClient;
use skytile::resolver::HttpImageLoader;

use crate::error::CliError;

/// Fetcher over the public GIBS service.
pub type GibsFetcher = TilePictureFetcher<HttpImageLoader<AsyncReqwestClient>>;

/// A point on Earth given on the command line.
#[derive(Debug, Clone, Args)]
pub struct CoordinateArgs {
    /// Latitude in degrees (north positive)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees (east positive)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

/// Lookup settings that override `[fetch]` in config.ini.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Zoom level (clamped to 0-9)
    #[arg(long, allow_negative_numbers = true)]
    pub zoom: Option<i32>,

    /// Number of past days to consider, today included
    #[arg(long)]
    pub days: Option<u32>,

    /// Per-candidate timeout in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seed for the date shuffle, for reproducible probe order
    #[arg(long)]
    pub seed: Option<u64>,
}

impl FetchArgs {
    /// Resolves lookup options: CLI first, then config.
    pub fn options(&self, config: &ConfigFile) -> FetchOptions {
        let mut options = config.fetch.options();
        if let Some(zoom) = self.zoom {
            options = options.with_zoom(zoom);
        }
        if let Some(days) = self.days {
            options = options.with_lookback_days(days);
        }
        options
    }

    pub fn attempt_timeout(&self, config: &ConfigFile) -> Option<Duration> {
        match self.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => config.fetch.attempt_timeout(),
        }
    }

    /// Builds a GIBS fetcher honouring the timeout and seed overrides.
    pub fn fetcher(&self, config: &ConfigFile) -> Result<GibsFetcher, CliError> {
        let fetcher = GibsFetcher::gibs()?.with_attempt_timeout(self.attempt_timeout(config));
        Ok(match self.seed {
            Some(seed) => fetcher.with_seed(seed),
            None => fetcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_fall_back_to_config() {
        let mut config = ConfigFile::default();
        config.fetch.zoom = 5;
        config.fetch.lookback_days = 12;

        let options = FetchArgs::default().options(&config);
        assert_eq!(options.zoom, 5);
        assert_eq!(options.lookback_days, 12);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ConfigFile::default();
        let args = FetchArgs {
            zoom: Some(3),
            days: Some(4),
            ..FetchArgs::default()
        };

        let options = args.options(&config);
        assert_eq!(options.zoom, 3);
        assert_eq!(options.lookback_days, 4);
    }

    #[test]
    fn test_timeout_override() {
        let config = ConfigFile::default();
        assert_eq!(
            FetchArgs::default().attempt_timeout(&config),
            Some(Duration::from_secs(15))
        );

        let disabled = FetchArgs {
            timeout: Some(0),
            ..FetchArgs::default()
        };
        assert_eq!(disabled.attempt_timeout(&config), None);
    }
}
