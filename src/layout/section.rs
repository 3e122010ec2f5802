//! # Section Grid
//!
//! One form section: an independently packed row space nested inside a
//! canvas cell. Row 0 is the pinned header — full width minus one reserved
//! margin column, not draggable, not resizable, excluded from packing.
//! Field placements begin on the row below it.
//!
//! A section is either empty or populated; there are no other states. Its
//! height is never stored here — [`auto_fit_height`] derives it from the
//! packing result on demand, and the canvas owns the stored copy.
//!
//! [`auto_fit_height`]: SectionGrid::auto_fit_height

use tracing::debug;

use crate::error::{FormGridError, FormGridResult};
use crate::grid::{GridConfig, GridRect};
use crate::layout::packing;
use crate::layout::FieldPlacement;
use crate::model::{FieldId, SectionId};

pub struct SectionGrid {
    section_id: SectionId,
    config: GridConfig,
    /// Field placements in insertion order. The packing engine keys off
    /// this order, so it is never re-sorted.
    placements: Vec<FieldPlacement>,
}

impl SectionGrid {
    pub fn new(section_id: SectionId, config: GridConfig) -> Self {
        Self {
            section_id,
            config,
            placements: Vec::new(),
        }
    }

    pub fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    /// The locked header row: row 0, one margin column reserved on the
    /// right.
    pub fn header_rect(&self) -> GridRect {
        GridRect::new(
            0,
            0,
            self.config.columns.saturating_sub(1).max(1),
            self.config.header_reserved_rows,
        )
    }

    pub fn placements(&self) -> &[FieldPlacement] {
        &self.placements
    }

    pub fn placement(&self, field_id: &FieldId) -> Option<&FieldPlacement> {
        self.placements.iter().find(|p| &p.field_id == field_id)
    }

    pub fn contains(&self, field_id: &FieldId) -> bool {
        self.placement(field_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn rects(&self) -> Vec<GridRect> {
        self.placements.iter().map(|p| p.rect).collect()
    }

    fn validate_width(&self, w: u32) -> FormGridResult<()> {
        if w == 0 {
            return Err(FormGridError::invalid_placement("width must be non-zero"));
        }
        if w > self.config.columns {
            return Err(FormGridError::invalid_placement(format!(
                "width {} exceeds column count {}",
                w, self.config.columns
            )));
        }
        Ok(())
    }

    /// Append a `w`×`h` field to the end of the current layout. Widths
    /// wider than the grid are rejected before any state changes.
    pub fn place_field(&mut self, field_id: FieldId, w: u32, h: u32) -> FormGridResult<FieldPlacement> {
        self.validate_width(w)?;
        if h == 0 {
            return Err(FormGridError::invalid_placement("height must be non-zero"));
        }

        let rect = packing::place_next(
            &self.rects(),
            w,
            h,
            self.config.columns,
            self.config.header_reserved_rows,
        );
        let placement = FieldPlacement {
            field_id,
            section_id: self.section_id.clone(),
            rect,
        };
        debug!(section = %self.section_id, field = %placement.field_id, ?rect, "placed field");
        self.placements.push(placement.clone());
        Ok(placement)
    }

    /// Remove a field and close the gap it leaves. Unknown ids are a
    /// no-op; returns whether anything was removed.
    pub fn remove_field(&mut self, field_id: &FieldId) -> bool {
        let before = self.placements.len();
        self.placements.retain(|p| &p.field_id != field_id);
        if self.placements.len() == before {
            return false;
        }
        debug!(section = %self.section_id, field = %field_id, "removed field");
        self.compact_in_place();
        true
    }

    /// Change a field's width and/or height, then repack. A requested
    /// width is snapped to the nearest bucket first; widths beyond the
    /// column count are rejected before snapping, with no state touched.
    ///
    /// Returns the field's new rect, or `None` when the id is unknown
    /// (silent no-op).
    pub fn set_field_size(
        &mut self,
        field_id: &FieldId,
        width: Option<u32>,
        height: Option<u32>,
    ) -> FormGridResult<Option<GridRect>> {
        let snapped = match width {
            Some(w) => {
                self.validate_width(w)?;
                Some(self.config.buckets.resolve(w))
            }
            None => None,
        };
        if height == Some(0) {
            return Err(FormGridError::invalid_placement("height must be non-zero"));
        }

        let Some(index) = self.placements.iter().position(|p| &p.field_id == field_id) else {
            return Ok(None);
        };

        if let Some(w) = snapped {
            self.placements[index].rect.w = w;
        }
        if let Some(h) = height {
            self.placements[index].rect.h = h;
        }
        self.compact_in_place();
        let rect = self.placements[index].rect;
        debug!(section = %self.section_id, field = %field_id, ?rect, "resized field");
        Ok(Some(rect))
    }

    /// Section height derived from the packing result: header rows, plus
    /// the content extent, plus bottom padding, never below the configured
    /// minimum.
    pub fn auto_fit_height(&self) -> u32 {
        let extent = self
            .placements
            .iter()
            .map(|p| p.rect.bottom())
            .max()
            .unwrap_or(0);
        let fitted = self.config.header_reserved_rows + extent + self.config.bottom_padding_rows;
        fitted.max(self.config.min_section_rows)
    }

    fn compact_in_place(&mut self) {
        let compacted = packing::compact(
            &self.rects(),
            self.config.columns,
            self.config.header_reserved_rows,
        );
        for (placement, rect) in self.placements.iter_mut().zip(compacted) {
            placement.rect = rect;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> SectionGrid {
        SectionGrid::new(SectionId::from("section-test"), GridConfig::default())
    }

    #[test]
    fn test_fields_start_below_the_header() {
        let mut grid = section();
        let placed = grid.place_field(FieldId::from("a"), 18, 5).unwrap();
        assert_eq!(placed.rect, GridRect::new(0, 1, 18, 5));
        assert_eq!(grid.header_rect(), GridRect::new(0, 0, 35, 1));
    }

    #[test]
    fn test_empty_section_reports_minimum_height() {
        let grid = section();
        assert_eq!(grid.auto_fit_height(), GridConfig::default().min_section_rows);
    }

    #[test]
    fn test_auto_fit_grows_with_content() {
        let mut grid = section();
        grid.place_field(FieldId::from("a"), 18, 5).unwrap();
        // header 1 + extent 6 + padding 3
        assert_eq!(grid.auto_fit_height(), 10);
    }

    #[test]
    fn test_remove_compacts_survivors() {
        let mut grid = section();
        grid.place_field(FieldId::from("a"), 36, 5).unwrap();
        grid.place_field(FieldId::from("b"), 36, 5).unwrap();
        assert_eq!(grid.placement(&FieldId::from("b")).unwrap().rect.y, 6);

        assert!(grid.remove_field(&FieldId::from("a")));
        assert_eq!(
            grid.placement(&FieldId::from("b")).unwrap().rect,
            GridRect::new(0, 1, 36, 5)
        );
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut grid = section();
        grid.place_field(FieldId::from("a"), 18, 5).unwrap();
        assert!(!grid.remove_field(&FieldId::from("ghost")));
        assert_eq!(grid.placements().len(), 1);
    }

    #[test]
    fn test_resize_snaps_width_to_bucket() {
        let mut grid = section();
        grid.place_field(FieldId::from("a"), 18, 5).unwrap();
        let rect = grid
            .set_field_size(&FieldId::from("a"), Some(20), None)
            .unwrap()
            .unwrap();
        assert_eq!(rect.w, 18); // 20 snaps back to medium
        let rect = grid
            .set_field_size(&FieldId::from("a"), Some(25), None)
            .unwrap()
            .unwrap();
        assert_eq!(rect.w, 27);
    }

    #[test]
    fn test_oversized_width_is_rejected_not_clamped() {
        let mut grid = section();
        grid.place_field(FieldId::from("a"), 18, 5).unwrap();
        let err = grid
            .set_field_size(&FieldId::from("a"), Some(40), None)
            .unwrap_err();
        assert!(matches!(err, FormGridError::InvalidPlacement(_)));
        // Nothing mutated.
        assert_eq!(
            grid.placement(&FieldId::from("a")).unwrap().rect.w,
            18
        );

        let err = grid.place_field(FieldId::from("b"), 40, 5).unwrap_err();
        assert!(matches!(err, FormGridError::InvalidPlacement(_)));
        assert_eq!(grid.placements().len(), 1);
    }

    #[test]
    fn test_resize_unknown_is_noop() {
        let mut grid = section();
        let result = grid.set_field_size(&FieldId::from("ghost"), None, Some(7)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_no_overlap_through_mixed_operations() {
        let mut grid = section();
        for (id, w) in [("a", 18), ("b", 9), ("c", 27), ("d", 18), ("e", 9)] {
            grid.place_field(FieldId::from(id), w, 5).unwrap();
        }
        grid.remove_field(&FieldId::from("c"));
        grid.set_field_size(&FieldId::from("b"), Some(27), Some(8)).unwrap();
        grid.remove_field(&FieldId::from("a"));
        grid.place_field(FieldId::from("f"), 36, 2).unwrap();

        let placements = grid.placements();
        for (i, a) in placements.iter().enumerate() {
            for b in placements.iter().skip(i + 1) {
                assert!(
                    !a.rect.intersects(&b.rect),
                    "{} overlaps {}",
                    a.field_id,
                    b.field_id
                );
            }
        }
    }
}
