//! Coordinate types shared by tile addressing and the travel driver.

use std::fmt;

/// Northern limit of the Web Mercator tiling scheme, in degrees.
pub const MAX_LAT: f64 = 85.05112878;

/// Southern limit of the Web Mercator tiling scheme, in degrees.
pub const MIN_LAT: f64 = -MAX_LAT;

/// Western limit of valid longitudes, in degrees.
pub const MIN_LON: f64 = -180.0;

/// Eastern limit of valid longitudes, in degrees.
pub const MAX_LON: f64 = 180.0;

/// Shallowest zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Deepest zoom level published by the `GoogleMapsCompatible_Level9` matrix set.
pub const MAX_ZOOM: u8 = 9;

/// A geographic point in degrees.
///
/// Callers own this value; the tile functions read it and never mutate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Longitude in degrees (-180.0 to 180.0).
    pub longitude: f64,
    /// Latitude in degrees (-90.0 to 90.0).
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate from longitude and latitude, in that order.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns a copy pulled into the range the tiling scheme can address.
    ///
    /// Latitude is clamped to [`MIN_LAT`, `MAX_LAT`] and longitude to
    /// [`MIN_LON`, `MAX_LON`]. Out-of-range input is never rejected.
    pub fn clamped(&self) -> Self {
        Self {
            longitude: self.longitude.clamp(MIN_LON, MAX_LON),
            latitude: clamp_latitude(self.latitude),
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Discrete tile position in the slippy-map grid.
///
/// Recomputed for every request, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Column (0 to 2^zoom - 1, west to east).
    pub x: u32,
    /// Row (0 to 2^zoom - 1, north to south).
    pub y: u32,
    /// Zoom level (0 to 9).
    pub zoom: u8,
}

impl TileAddress {
    /// Creates a tile address.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.y, self.x)
    }
}

/// Clamps a latitude to the tiling scheme's valid range.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Clamps a requested zoom level to [`MIN_ZOOM`, `MAX_ZOOM`].
#[inline]
pub fn clamp_zoom(zoom: i32) -> u8 {
    zoom.clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
}
