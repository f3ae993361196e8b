//! Coordinate conversion module
//!
//! Maps geographic coordinates (longitude/latitude) onto the spherical Web
//! Mercator tile grid that GIBS publishes its `GoogleMapsCompatible` layers in.

mod types;

pub use types::{
    clamp_latitude, clamp_zoom, GeoCoordinate, TileAddress, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to a tile address.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `lat` - Latitude in degrees, already clamped to [`MIN_LAT`, `MAX_LAT`]
/// * `zoom` - Zoom level (0 to 9)
///
/// The row is derived through the logarithmic Mercator identity
/// `ln(tan(φ) + sec(φ))`. Both indices are floored. The clamp bound sits a
/// few nanodegrees past the projection's true edge, and longitude 180 lands
/// one column past the grid, so indices are pinned to the last row/column.
#[inline]
pub fn compute_tile_index(lon: f64, lat: f64, zoom: u8) -> TileAddress {
    let n = 2.0_f64.powi(zoom as i32);
    let last = n - 1.0;

    let x = ((lon + 180.0) / 360.0 * n).floor();

    let lat_rad = lat * PI / 180.0;
    let mercator = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();
    let y = ((1.0 - mercator / PI) / 2.0 * n).floor();

    TileAddress {
        x: x.clamp(0.0, last) as u32,
        y: y.clamp(0.0, last) as u32,
        zoom,
    }
}

/// Clamps a coordinate and zoom request, then computes its tile address.
///
/// This is the entry used by the picture fetcher: out-of-range latitude and
/// zoom are pulled to the nearest valid value instead of being rejected.
#[inline]
pub fn tile_for(coord: GeoCoordinate, zoom: i32) -> TileAddress {
    let clamped = coord.clamped();
    compute_tile_index(clamped.longitude, clamped.latitude, clamp_zoom(zoom))
}

/// Converts a tile address back to geographic coordinates.
///
/// Returns the coordinate of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileAddress) -> GeoCoordinate {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    GeoCoordinate::new(lon, lat)
}
