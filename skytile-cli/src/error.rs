//! CLI error type.

use std::path::PathBuf;

use skytile::config::ConfigError;
use skytile::geoip::GeoIpError;
use skytile::logging::LoggingError;
use skytile::provider::ProviderError;
use skytile::resolver::ResolveError;
use thiserror::Error;

/// Errors surfaced to the user by the `skytile` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("failed to set up logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("failed to create HTTP client: {0}")]
    Http(#[from] ProviderError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("location lookup failed: {0}")]
    Locate(#[from] GeoIpError),

    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}
