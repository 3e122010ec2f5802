//! # Grid Units
//!
//! The atomic coordinate and sizing primitives every other layout component
//! is built on: placement rectangles in integer column/row units, the
//! pixel-to-row conversion used by auto-fit sizing, and the width bucket
//! table that drag-resized widths snap to.
//!
//! All values here are configuration, not constants of the design. A canvas
//! is constructed once from a [`GridConfig`] and the numbers never change
//! for its lifetime.

use serde::{Deserialize, Serialize};

/// A placement rectangle in grid units: column `x`, row `y`, `w` columns
/// wide, `h` rows tall. Coordinates are unsigned, so negative positions are
/// unrepresentable; `w` and `h` must be non-zero for a rect to be valid in
/// any grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost occupied column.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the bottommost occupied row.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Do two rects share any cell?
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// The column-width classes a field can occupy, in grid columns.
///
/// Snapping an arbitrary width picks the nearest bucket: the inclusive
/// upper cut for each bucket is the floor midpoint between it and the next
/// one (13, 22, 31 for the default 9/18/27/36 table). Widths below the
/// smallest cut clamp to `small`, widths above the largest clamp to `full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthBuckets {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub full: u32,
}

impl Default for WidthBuckets {
    fn default() -> Self {
        Self {
            small: 9,
            medium: 18,
            large: 27,
            full: 36,
        }
    }
}

impl WidthBuckets {
    /// Snap a width to the nearest bucket. Pure: same input, same output,
    /// and the output is always one of the four configured values.
    pub fn resolve(&self, width: u32) -> u32 {
        if width <= (self.small + self.medium) / 2 {
            self.small
        } else if width <= (self.medium + self.large) / 2 {
            self.medium
        } else if width <= (self.large + self.full) / 2 {
            self.large
        } else {
            self.full
        }
    }
}

/// Fixed per-canvas grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Column count shared by the canvas and every section interior.
    pub columns: u32,

    /// Pixel height of one grid row inside a section. Drives the
    /// rendered-content-to-rows conversion in auto-fit sizing.
    pub cell_height_px: f64,

    /// Rows reserved at the top of every section for its pinned header.
    pub header_reserved_rows: u32,

    /// Rows of breathing room kept below the lowest field in a section.
    pub bottom_padding_rows: u32,

    /// Minimum (and initial) section height in canvas rows. Auto-fit never
    /// shrinks a section below this.
    pub min_section_rows: u32,

    /// Width classes fields snap to.
    pub buckets: WidthBuckets,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 36,
            cell_height_px: 20.0,
            header_reserved_rows: 1,
            bottom_padding_rows: 3,
            min_section_rows: 8,
            buckets: WidthBuckets::default(),
        }
    }
}

impl GridConfig {
    /// Convert a rendered pixel height to grid rows, rounding up.
    /// `pixel_height` is never negative in practice; a non-positive input
    /// maps to zero rows rather than wrapping.
    pub fn rows_for_pixels(&self, pixel_height: f64) -> u32 {
        if pixel_height <= 0.0 || self.cell_height_px <= 0.0 {
            return 0;
        }
        (pixel_height / self.cell_height_px).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_for_pixels_rounds_up() {
        let config = GridConfig::default();
        assert_eq!(config.rows_for_pixels(0.0), 0);
        assert_eq!(config.rows_for_pixels(1.0), 1);
        assert_eq!(config.rows_for_pixels(20.0), 1);
        assert_eq!(config.rows_for_pixels(20.1), 2);
        assert_eq!(config.rows_for_pixels(100.0), 5);
    }

    #[test]
    fn test_resolve_snaps_to_configured_buckets() {
        let buckets = WidthBuckets::default();
        assert_eq!(buckets.resolve(1), 9);
        assert_eq!(buckets.resolve(9), 9);
        assert_eq!(buckets.resolve(13), 9); // inclusive cut
        assert_eq!(buckets.resolve(14), 18);
        assert_eq!(buckets.resolve(22), 18);
        assert_eq!(buckets.resolve(23), 27);
        assert_eq!(buckets.resolve(31), 27);
        assert_eq!(buckets.resolve(32), 36);
        assert_eq!(buckets.resolve(100), 36); // clamp above largest
    }

    #[test]
    fn test_resolve_is_closed_over_the_bucket_set() {
        let buckets = WidthBuckets::default();
        let values = [buckets.small, buckets.medium, buckets.large, buckets.full];
        for w in 0..=80 {
            assert!(values.contains(&buckets.resolve(w)));
        }
    }

    #[test]
    fn test_rect_intersection() {
        let a = GridRect::new(0, 0, 18, 5);
        let b = GridRect::new(18, 0, 18, 5);
        let c = GridRect::new(10, 2, 10, 2);
        assert!(!a.intersects(&b)); // edge-adjacent, no shared cell
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }
}
