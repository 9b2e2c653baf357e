//! Coordinate types for the Web Mercator tile grid.

use thiserror::Error;

/// Minimum latitude representable in Web Mercator (degrees).
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum latitude representable in Web Mercator (degrees).
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum longitude (degrees).
pub const MIN_LON: f64 = -180.0;

/// Maximum zoom level supported by the tile grid.
pub const MAX_ZOOM: u8 = 18;

/// Errors from coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside the Web Mercator range.
    #[error("latitude {0} outside Web Mercator range [{MIN_LAT}, {MAX_LAT}]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("longitude {0} outside range [-180, 180]")]
    InvalidLongitude(f64),

    /// Zoom level beyond the supported maximum.
    #[error("zoom level {0} exceeds maximum {MAX_ZOOM}")]
    InvalidZoom(u8),
}

/// A single tile in the slippy-map grid, addressed by (zoom, x, y).
///
/// `col` is the X coordinate (increases eastward) and `row` is the
/// Y coordinate (increases southward). Both lie in `[0, 2^zoom - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile column (X coordinate, west to east).
    pub col: u32,
    /// Tile row (Y coordinate, north to south).
    pub row: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    pub fn new(col: u32, row: u32, zoom: u8) -> Self {
        Self { col, row, zoom }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.zoom, self.col, self.row)
    }
}

/// A geographic bounding box in WGS84 degrees.
///
/// The box is interpreted as `[min_lat, max_lat] x [min_lon, max_lon]`.
/// Fields are public so regions can be declared as constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge (degrees).
    pub min_lat: f64,
    /// Northern edge (degrees).
    pub max_lat: f64,
    /// Western edge (degrees).
    pub min_lon: f64,
    /// Eastern edge (degrees).
    pub max_lon: f64,
}

impl BoundingBox {
    /// Administrative bounds of Shanghai (WGS84).
    pub const SHANGHAI: BoundingBox = BoundingBox {
        min_lat: 30.67,
        max_lat: 31.88,
        min_lon: 120.85,
        max_lon: 122.20,
    };

    /// Creates a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Returns the northwest corner as (lat, lon).
    pub fn northwest(&self) -> (f64, f64) {
        (self.max_lat, self.min_lon)
    }

    /// Returns the southeast corner as (lat, lon).
    pub fn southeast(&self) -> (f64, f64) {
        (self.min_lat, self.max_lon)
    }
}

/// An inclusive rectangle of tile indices at a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    /// Westernmost column.
    pub min_col: u32,
    /// Easternmost column.
    pub max_col: u32,
    /// Northernmost row.
    pub min_row: u32,
    /// Southernmost row.
    pub max_row: u32,
}

impl TileRange {
    /// Returns the number of tiles in the rectangle.
    pub fn count(&self) -> u64 {
        let cols = (self.max_col - self.min_col + 1) as u64;
        let rows = (self.max_row - self.min_row + 1) as u64;
        cols * rows
    }

    /// Returns true if the given tile lies inside the rectangle.
    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.min_col..=self.max_col).contains(&col) && (self.min_row..=self.max_row).contains(&row)
    }
}
