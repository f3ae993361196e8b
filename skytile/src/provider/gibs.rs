//! NASA GIBS (Global Imagery Browse Services) tile endpoint.
//!
//! GIBS publishes daily true-colour mosaics from several satellite
//! instruments over WMTS, with no API key or authentication.
//!
//! # URL Pattern
//!
//! `https://gibs.earthdata.nasa.gov/wmts/epsg3857/best/{layer}/default/{date}/GoogleMapsCompatible_Level9/{z}/{y}/{x}.jpg?t={millis}`
//!
//! - `date` is an ISO calendar date (`YYYY-MM-DD`)
//! - Uses standard XYZ tile coordinates (y=row, x=col)
//! - The `t` query parameter is a cache buster; GIBS ignores it
//!
//! # Coverage
//!
//! - Global, one mosaic per instrument per day
//! - Today's mosaic is often missing for hours (processing latency), and
//!   swath gaps leave some regions empty on a given day for one instrument
//!   but not the other
//!
//! # Coordinate System
//!
//! Uses the `GoogleMapsCompatible_Level9` tile matrix set (EPSG:3857):
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level (0 to 9)

use std::fmt;

use chrono::NaiveDate;

use crate::coord::TileAddress;

/// Base URL for the GIBS Web Mercator "best available" endpoint.
pub const GIBS_BASE_URL: &str = "https://gibs.earthdata.nasa.gov/wmts/epsg3857/best";

/// Tile matrix set shared by both true-colour layers.
pub const TILE_MATRIX_SET: &str = "GoogleMapsCompatible_Level9";

/// A GIBS true-colour imagery layer.
///
/// Each layer comes from an independent instrument, so either may lack a
/// mosaic for a given date and region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// VIIRS on Suomi NPP.
    ViirsSnpp,
    /// MODIS on Terra.
    ModisTerra,
}

impl Layer {
    /// Every layer, in the order candidates probe them for a date.
    pub const ALL: [Layer; 2] = [Layer::ViirsSnpp, Layer::ModisTerra];

    /// WMTS layer identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            Layer::ViirsSnpp => "VIIRS_SNPP_CorrectedReflectance_TrueColor",
            Layer::ModisTerra => "MODIS_Terra_CorrectedReflectance_TrueColor",
        }
    }

    /// Short human-readable instrument name.
    pub fn instrument(&self) -> &'static str {
        match self {
            Layer::ViirsSnpp => "VIIRS (Suomi NPP)",
            Layer::ModisTerra => "MODIS (Terra)",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Builds the tile URL for a layer, date and tile.
///
/// The shape is fixed by the upstream service and must not change.
pub fn tile_url(
    layer: Layer,
    date: NaiveDate,
    tile: &TileAddress,
    cache_buster_millis: i64,
) -> String {
    format!(
        "{}/{}/default/{}/{}/{}/{}/{}.jpg?t={}",
        GIBS_BASE_URL,
        layer.identifier(),
        date.format("%Y-%m-%d"),
        TILE_MATRIX_SET,
        tile.zoom,
        tile.y,
        tile.x,
        cache_buster_millis
    )
}
