//! Skytile - Recent satellite pictures for any point on Earth
//!
//! This library locates the Web Mercator tile containing a coordinate and
//! fetches a recent true-color picture of it from NASA GIBS. Imagery for a
//! given day and instrument is often missing, so a shuffled list of dates
//! and layers is probed in order until one loads.
//!
//! # High-Level API
//!
//! ```ignore
//! use skytile::picture::{FetchOptions, TilePictureFetcher};
//!
//! let fetcher = TilePictureFetcher::gibs()?;
//! let picture = fetcher
//!     .get_tile_picture(-58.3816, -34.6037, FetchOptions::default())
//!     .await?;
//! println!("{} ({:?})", picture.url(), picture.dimensions());
//! ```

pub mod candidates;
pub mod config;
pub mod coord;
pub mod geoip;
pub mod history;
pub mod logging;
pub mod picture;
pub mod provider;
pub mod resolver;
pub mod travel;

/// Version of the Skytile library and CLI.
///
/// Shared across the workspace through `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
