//! Lazy enumeration of the tiles covering a region across zoom levels.
//!
//! [`RegionTiles`] is a pure function of its inputs: two iterators built
//! from the same bounding box and zoom range yield the same sequence, so a
//! caller can count tiles up front and then enumerate them again for
//! submission.

use super::types::{BoundingBox, CoordError, TileCoord, TileRange};
use super::tile_range_for_zoom;

/// Iterator over every tile of a bounding box for a range of zoom levels.
///
/// Tiles are yielded ordered by zoom ascending, then column ascending,
/// then row ascending. Each tile appears exactly once.
///
/// # Example
///
/// ```
/// use tilepull::coord::{BoundingBox, RegionTiles};
///
/// let tiles = RegionTiles::new(&BoundingBox::SHANGHAI, 13, 13).unwrap();
/// assert_eq!(tiles.total(), 1188);
/// ```
#[derive(Debug, Clone)]
pub struct RegionTiles {
    ranges: Vec<(u8, TileRange)>,
    // Iteration state: index into `ranges` plus the next (col, row).
    zoom_idx: usize,
    col: u32,
    row: u32,
}

impl RegionTiles {
    /// Builds the tile enumeration for `bbox` over `[zoom_start, zoom_end]`
    /// (inclusive). An inverted zoom range produces an empty iterator.
    ///
    /// # Errors
    ///
    /// Returns `CoordError` if the bounding box lies outside the Web
    /// Mercator latitude band or a zoom level exceeds the supported maximum.
    pub fn new(bbox: &BoundingBox, zoom_start: u8, zoom_end: u8) -> Result<Self, CoordError> {
        let mut ranges = Vec::new();
        for zoom in zoom_start..=zoom_end {
            ranges.push((zoom, tile_range_for_zoom(bbox, zoom)?));
        }

        let (col, row) = match ranges.first() {
            Some((_, range)) => (range.min_col, range.min_row),
            None => (0, 0),
        };

        Ok(Self {
            ranges,
            zoom_idx: 0,
            col,
            row,
        })
    }

    /// The per-zoom tile rectangles, ordered by zoom ascending.
    pub fn ranges(&self) -> &[(u8, TileRange)] {
        &self.ranges
    }

    /// Total number of tiles the full iteration will yield.
    ///
    /// Independent of how far this iterator has already advanced.
    pub fn total(&self) -> u64 {
        self.ranges.iter().map(|(_, range)| range.count()).sum()
    }
}

impl Iterator for RegionTiles {
    type Item = TileCoord;

    fn next(&mut self) -> Option<TileCoord> {
        let (zoom, range) = *self.ranges.get(self.zoom_idx)?;
        let tile = TileCoord::new(self.col, self.row, zoom);

        // Advance row-innermost, column next, zoom outermost.
        if self.row < range.max_row {
            self.row += 1;
        } else if self.col < range.max_col {
            self.col += 1;
            self.row = range.min_row;
        } else {
            self.zoom_idx += 1;
            if let Some((_, next_range)) = self.ranges.get(self.zoom_idx) {
                self.col = next_range.min_col;
                self.row = next_range.min_row;
            }
        }

        Some(tile)
    }
}
