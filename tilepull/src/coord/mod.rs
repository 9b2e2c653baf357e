//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, plus the tile-range computation used
//! to cover a bounding box at a given zoom level.

mod region;
mod types;

pub use region::RegionTiles;
pub use types::{
    BoundingBox, CoordError, TileCoord, TileRange, MAX_LAT, MAX_ZOOM, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 18)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=180.0).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    // Number of tiles along each axis at this zoom level
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = (1u32 << zoom) - 1;

    // Convert longitude to tile X coordinate
    let col = (((lon + 180.0) / 360.0 * n) as u32).min(max_index);

    // Convert latitude to tile Y coordinate using Web Mercator projection.
    // Clamped so the extreme edges of the valid band stay on the grid.
    let lat_rad = lat * PI / 180.0;
    let row = ((((1.0 - lat_rad.tan().asinh() / PI) / 2.0) * n) as u32).min(max_index);

    Ok(TileCoord { col, row, zoom })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    // Convert tile X coordinate to longitude
    let lon = tile.col as f64 / n * 360.0 - 180.0;

    // Convert tile Y coordinate to latitude using inverse Web Mercator
    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Computes the tile rectangle covering a bounding box at a zoom level.
///
/// The NW and SE corners of the box are projected to tile indices, the
/// elementwise min/max forms a rectangle, and the rectangle is expanded by
/// one tile on every side (then clipped to the grid) so the downloaded
/// area strictly covers the requested bounds. Corner-to-corner suffices
/// because tile index is monotonic in latitude and longitude separately.
pub fn tile_range_for_zoom(bbox: &BoundingBox, zoom: u8) -> Result<TileRange, CoordError> {
    let (nw_lat, nw_lon) = bbox.northwest();
    let (se_lat, se_lon) = bbox.southeast();

    let nw = to_tile_coords(nw_lat, nw_lon, zoom)?;
    let se = to_tile_coords(se_lat, se_lon, zoom)?;

    let max_index = (1u32 << zoom) - 1;

    Ok(TileRange {
        min_col: nw.col.min(se.col).saturating_sub(1),
        max_col: (nw.col.max(se.col).saturating_add(1)).min(max_index),
        min_row: nw.row.min(se.row).saturating_sub(1),
        max_row: (nw.row.max(se.row).saturating_add(1)).min(max_index),
    })
}
