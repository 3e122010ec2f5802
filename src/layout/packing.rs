//! # Packing Engine
//!
//! Pure placement math over slices of [`GridRect`]. Two operations:
//!
//! - [`place_next`] appends a new rect after the last one in insertion
//!   order, wrapping to a fresh row when the current one is full. This is
//!   first-fit-append, not bin-packing: earlier gaps are never back-filled
//!   except through an explicit [`compact`].
//! - [`compact`] replays the whole set through `place_next` in insertion
//!   order, so removals and resizes leave no dead vertical space behind.
//!
//! Both are deterministic and side-effect free; the containers above them
//! own all state.

use crate::grid::GridRect;

/// Compute the next free placement for a `w`×`h` rect appended to
/// `existing`.
///
/// The anchor is the LAST rect in insertion order, not the one with the
/// highest `y`: if the new rect still fits to its right the row is
/// continued, otherwise the placement wraps to column 0 on the row just
/// below the anchor. An exact fit (`last.right() + w == columns`) stays on
/// the row. An empty set places at `(0, start_row)`.
///
/// When row heights diverge (a field was resized taller than its row
/// mates), the candidate cell can land inside an earlier rect; the
/// placement then slides down past every collider. Siblings never overlap.
pub fn place_next(existing: &[GridRect], w: u32, h: u32, columns: u32, start_row: u32) -> GridRect {
    let Some(last) = existing.last() else {
        return GridRect::new(0, start_row, w, h);
    };

    let mut candidate = if last.right() + w > columns {
        GridRect::new(0, last.bottom(), w, h)
    } else {
        GridRect::new(last.right(), last.y, w, h)
    };

    // Slide below any occupied cells. Each pass moves strictly downward,
    // so this terminates.
    loop {
        let collision_floor = existing
            .iter()
            .filter(|r| r.intersects(&candidate))
            .map(GridRect::bottom)
            .max();
        match collision_floor {
            Some(floor) => candidate.y = floor,
            None => return candidate,
        }
    }
}

/// Re-lay `placements` from `start_row`, preserving insertion order and
/// each rect's size, eliminating the vertical gaps left by removal or
/// resize.
///
/// Deterministic and idempotent: compacting an already-compacted set
/// returns it unchanged.
pub fn compact(placements: &[GridRect], columns: u32, start_row: u32) -> Vec<GridRect> {
    let mut out: Vec<GridRect> = Vec::with_capacity(placements.len());
    for rect in placements {
        let placed = place_next(&out, rect.w, rect.h, columns, start_row);
        out.push(placed);
    }
    out
}

/// One past the bottommost occupied row, or `start_row` for an empty set.
pub fn content_extent(placements: &[GridRect], start_row: u32) -> u32 {
    placements
        .iter()
        .map(GridRect::bottom)
        .max()
        .unwrap_or(start_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_no_overlap(placements: &[GridRect]) {
        for (i, a) in placements.iter().enumerate() {
            for b in placements.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_place_next_empty_set() {
        let placed = place_next(&[], 18, 5, 36, 1);
        assert_eq!(placed, GridRect::new(0, 1, 18, 5));
    }

    #[test]
    fn test_place_next_continues_row() {
        let existing = vec![GridRect::new(0, 1, 18, 5)];
        let placed = place_next(&existing, 18, 5, 36, 1);
        assert_eq!(placed, GridRect::new(18, 1, 18, 5)); // exact fit stays on the row
    }

    #[test]
    fn test_place_next_wraps_when_row_is_full() {
        let existing = vec![GridRect::new(0, 1, 18, 5), GridRect::new(18, 1, 18, 5)];
        let placed = place_next(&existing, 18, 5, 36, 1);
        // 18 + 18 + 18 = 54 > 36, so wrap below the anchor
        assert_eq!(placed, GridRect::new(0, 6, 18, 5));
    }

    #[test]
    fn test_place_next_anchors_on_last_not_lowest() {
        // Last rect sits higher than an earlier tall one; the append
        // still keys off the last rect's row.
        let existing = vec![GridRect::new(0, 1, 9, 10), GridRect::new(9, 1, 9, 2)];
        let placed = place_next(&existing, 9, 2, 36, 1);
        assert_eq!(placed, GridRect::new(18, 1, 9, 2));
    }

    #[test]
    fn test_place_next_slides_below_taller_row_mate() {
        // Wrapping below a short anchor would land inside the tall first
        // rect; the placement must slide past it.
        let existing = vec![GridRect::new(0, 1, 18, 10), GridRect::new(18, 1, 18, 5)];
        let placed = place_next(&existing, 18, 5, 36, 1);
        assert_eq!(placed, GridRect::new(0, 10 + 1, 18, 5));
        let mut all = existing;
        all.push(placed);
        assert_no_overlap(&all);
    }

    #[test]
    fn test_compact_closes_vertical_gaps() {
        // A survivor stranded on row 12 after removals above it.
        let placements = vec![GridRect::new(0, 12, 18, 5)];
        let compacted = compact(&placements, 36, 1);
        assert_eq!(compacted, vec![GridRect::new(0, 1, 18, 5)]);
    }

    #[test]
    fn test_compact_preserves_order_and_sizes() {
        let placements = vec![
            GridRect::new(0, 7, 18, 5),
            GridRect::new(18, 7, 9, 3),
            GridRect::new(0, 20, 27, 4),
        ];
        let compacted = compact(&placements, 36, 1);
        assert_eq!(compacted.len(), 3);
        assert_eq!(compacted[0], GridRect::new(0, 1, 18, 5));
        assert_eq!(compacted[1], GridRect::new(18, 1, 9, 3));
        // 18 + 9 + 27 > 36: third wraps, then slides below the 5-tall first
        assert_eq!(compacted[2], GridRect::new(0, 6, 27, 4));
        assert_no_overlap(&compacted);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let placements = vec![
            GridRect::new(0, 9, 18, 5),
            GridRect::new(0, 30, 36, 2),
            GridRect::new(5, 40, 9, 5),
        ];
        let once = compact(&placements, 36, 1);
        let twice = compact(&once, 36, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_compact_never_overlaps() {
        let placements = vec![
            GridRect::new(0, 3, 18, 5),
            GridRect::new(0, 9, 18, 2),
            GridRect::new(0, 15, 27, 4),
            GridRect::new(0, 22, 9, 1),
        ];
        let compacted = compact(&placements, 36, 1);
        assert_no_overlap(&compacted);
    }

    #[test]
    fn test_content_extent() {
        assert_eq!(content_extent(&[], 1), 1);
        let placements = vec![GridRect::new(0, 1, 18, 5), GridRect::new(18, 1, 18, 7)];
        assert_eq!(content_extent(&placements, 1), 8);
    }
}
