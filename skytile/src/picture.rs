//! Picture fetcher: the public entry point.
//!
//! [`TilePictureFetcher::get_tile_picture`] clamps the request, computes the
//! tile address, builds a freshly shuffled candidate list and hands it to the
//! [`Resolver`].
//!
//! # Example
//!
//! ```ignore
//! use skytile::picture::{FetchOptions, TilePictureFetcher};
//!
//! let fetcher = TilePictureFetcher::gibs()?;
//! let picture = fetcher
//!     .get_tile_picture(-58.3816, -34.6037, FetchOptions::default())
//!     .await?;
//! picture.image().save("buenos-aires.jpg")?;
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::candidates::{build_candidate_addresses, Candidate, CandidateList};
use crate::coord::{tile_for, GeoCoordinate, TileAddress};
use crate::provider::{AsyncReqwestClient, ProviderError};
use crate::resolver::{HttpImageLoader, ImageLoader, LoadedImage, ResolveError, Resolver};

/// Default zoom level (the deepest the GIBS matrix set publishes).
pub const DEFAULT_ZOOM: i32 = 9;

/// Default number of calendar days searched.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 80;

/// Options for a single picture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Requested zoom; clamped to 0..=9.
    pub zoom: i32,
    /// Calendar days to search, counting today.
    pub lookback_days: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl FetchOptions {
    pub fn with_zoom(mut self, zoom: i32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }
}

/// Source of "now" for candidate dates and cache busters.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fetches one viewable satellite picture for a coordinate.
///
/// Independent calls on a shared fetcher may overlap; each runs its own
/// sequential candidate chain. The random source is only locked while a
/// candidate list is shuffled.
pub struct TilePictureFetcher<L: ImageLoader, K: Clock = SystemClock> {
    resolver: Resolver<L>,
    clock: K,
    rng: Mutex<StdRng>,
}

impl TilePictureFetcher<HttpImageLoader<AsyncReqwestClient>> {
    /// Creates a fetcher for the public GIBS service with default settings.
    pub fn gibs() -> Result<Self, ProviderError> {
        Ok(Self::new(HttpImageLoader::new(AsyncReqwestClient::new()?)))
    }
}

impl<L: ImageLoader> TilePictureFetcher<L> {
    /// Creates a fetcher using the system clock and an OS-seeded shuffle.
    pub fn new(loader: L) -> Self {
        Self {
            resolver: Resolver::new(loader),
            clock: SystemClock,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl<L: ImageLoader, K: Clock> TilePictureFetcher<L, K> {
    /// Replaces the clock.
    pub fn with_clock<K2: Clock>(self, clock: K2) -> TilePictureFetcher<L, K2> {
        TilePictureFetcher {
            resolver: self.resolver,
            clock,
            rng: self.rng,
        }
    }

    /// Replaces the shuffle source with a seeded one, making probe order
    /// reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Sets the per-candidate timeout. `None` disables it.
    pub fn with_attempt_timeout(self, timeout: Option<Duration>) -> Self {
        Self {
            resolver: self.resolver.with_attempt_timeout(timeout),
            ..self
        }
    }

    pub fn resolver(&self) -> &Resolver<L> {
        &self.resolver
    }

    /// Computes the tile and candidate list a request would probe, without
    /// fetching anything.
    pub fn plan(
        &self,
        coord: GeoCoordinate,
        options: FetchOptions,
    ) -> (TileAddress, CandidateList) {
        let tile = tile_for(coord, options.zoom);
        let reference = self.clock.now();
        let candidates = {
            let mut rng = self.rng.lock();
            build_candidate_addresses(&tile, options.lookback_days, reference, &mut *rng)
        };
        (tile, candidates)
    }

    /// Resolves one picture for `(longitude, latitude)`.
    ///
    /// Fails only when every candidate missed.
    pub async fn get_tile_picture(
        &self,
        longitude: f64,
        latitude: f64,
        options: FetchOptions,
    ) -> Result<LoadedImage, ResolveError> {
        self.get_tile_picture_with_progress(longitude, latitude, options, |_, _, _| {})
            .await
    }

    /// Like [`get_tile_picture`](Self::get_tile_picture), reporting each probe
    /// as `on_attempt(index, total, candidate)`.
    pub async fn get_tile_picture_with_progress<F>(
        &self,
        longitude: f64,
        latitude: f64,
        options: FetchOptions,
        mut on_attempt: F,
    ) -> Result<LoadedImage, ResolveError>
    where
        F: FnMut(usize, usize, &Candidate),
    {
        let coord = GeoCoordinate::new(longitude, latitude);
        let (tile, candidates) = self.plan(coord, options);
        let total = candidates.len();

        debug!(
            coord = %coord,
            tile = %tile,
            candidates = total,
            "Resolving tile picture"
        );

        self.resolver
            .resolve_with_progress(candidates, |index, candidate| {
                on_attempt(index, total, candidate)
            })
            .await
    }
}
