//! Coordinate wandering for the periodic travel driver.
//!
//! A [`Journey`] holds the current position. Each step resolves a picture
//! there and, only when that succeeds, nudges the position by a random offset
//! so the next step looks somewhere nearby.

use rand::Rng;

use crate::coord::GeoCoordinate;
use crate::picture::{Clock, FetchOptions, TilePictureFetcher};
use crate::resolver::{ImageLoader, LoadedImage, ResolveError};

/// Default width of the perturbation window in degrees (±0.5°).
pub const DEFAULT_STEP_DEGREES: f64 = 1.0;

/// Wraps a longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Moves a coordinate by an independent uniform offset in
/// `[-step/2, step/2)` on each axis.
///
/// Latitude is clamped to [-90, 90]; longitude wraps around the antimeridian.
pub fn perturb<R: Rng + ?Sized>(coord: GeoCoordinate, step: f64, rng: &mut R) -> GeoCoordinate {
    let d_lat = rng.random::<f64>() * step - step / 2.0;
    let d_lon = rng.random::<f64>() * step - step / 2.0;

    GeoCoordinate {
        longitude: wrap_longitude(coord.longitude + d_lon),
        latitude: (coord.latitude + d_lat).clamp(-90.0, 90.0),
    }
}

/// Position state for a sequence of picture lookups.
#[derive(Debug, Clone)]
pub struct Journey {
    position: GeoCoordinate,
    step_degrees: f64,
}

impl Journey {
    pub fn new(start: GeoCoordinate) -> Self {
        Self {
            position: start,
            step_degrees: DEFAULT_STEP_DEGREES,
        }
    }

    pub fn with_step_degrees(mut self, step: f64) -> Self {
        self.step_degrees = step;
        self
    }

    pub fn position(&self) -> GeoCoordinate {
        self.position
    }

    /// Resolves a picture at the current position, then moves on success.
    ///
    /// On failure the position is kept so the next step retries the same
    /// place with a fresh shuffle.
    pub async fn advance<L, K, R>(
        &mut self,
        fetcher: &TilePictureFetcher<L, K>,
        options: FetchOptions,
        rng: &mut R,
    ) -> Result<LoadedImage, ResolveError>
    where
        L: ImageLoader,
        K: Clock,
        R: Rng + ?Sized,
    {
        let picture = fetcher
            .get_tile_picture(self.position.longitude, self.position.latitude, options)
            .await?;
        self.position = perturb(self.position, self.step_degrees, rng);
        Ok(picture)
    }
}
