//! # Rendering Collaborator Seam
//!
//! The core never renders a field. It hands the rendering layer a type and
//! a placement rect, gets back an opaque content handle, and asks that
//! handle two things: how tall the rendered content actually is (valid
//! only after the environment's render pass has settled) and what
//! structure it currently shows (the read-only projection merged into
//! snapshots).
//!
//! [`StaticRenderer`] is the in-crate implementation: a headless measurer
//! whose handles report a fixed per-type pixel height. The CLI and the
//! test suite run on it; an interactive host supplies its own.

use std::collections::HashMap;

use crate::grid::GridRect;
use crate::model::document::ParsedStructure;
use crate::model::{FieldType, TableColumn};

/// Opaque handle to one field's rendered content.
pub trait FieldContent {
    /// Rendered pixel height. Only accurate after the environment signals
    /// that its render pass for the current update has settled.
    fn measured_pixel_height(&self) -> f64;

    /// Structural attributes currently visible in the rendered output.
    fn parse_structure(&self) -> ParsedStructure;
}

/// The field factory the environment plugs in.
pub trait FieldRenderer {
    fn create_field(&mut self, field_type: FieldType, rect: GridRect) -> Box<dyn FieldContent>;
}

/// Headless renderer: every handle reports a fixed pixel height for its
/// type. By default that is the type's default row count times the cell
/// height, so measurement settles to exactly the declared footprint;
/// overrides simulate content that renders taller or shorter.
pub struct StaticRenderer {
    cell_height_px: f64,
    overrides: HashMap<FieldType, f64>,
}

impl StaticRenderer {
    pub fn new(cell_height_px: f64) -> Self {
        Self {
            cell_height_px,
            overrides: HashMap::new(),
        }
    }

    /// Report `pixel_height` for every field of `field_type`.
    pub fn with_height(mut self, field_type: FieldType, pixel_height: f64) -> Self {
        self.overrides.insert(field_type, pixel_height);
        self
    }
}

impl FieldRenderer for StaticRenderer {
    fn create_field(&mut self, field_type: FieldType, _rect: GridRect) -> Box<dyn FieldContent> {
        let pixel_height = self
            .overrides
            .get(&field_type)
            .copied()
            .unwrap_or(field_type.default_rows() as f64 * self.cell_height_px);
        Box::new(StaticContent {
            field_type,
            pixel_height,
        })
    }
}

struct StaticContent {
    field_type: FieldType,
    pixel_height: f64,
}

impl FieldContent for StaticContent {
    fn measured_pixel_height(&self) -> f64 {
        self.pixel_height
    }

    fn parse_structure(&self) -> ParsedStructure {
        // Echo what a freshly rendered control of this type displays.
        let columns = match self.field_type {
            FieldType::Table => Some(vec![
                TableColumn { header: "Column A".to_string() },
                TableColumn { header: "Column B".to_string() },
                TableColumn { header: "Column C".to_string() },
            ]),
            _ => None,
        };
        ParsedStructure {
            field_type: Some(self.field_type),
            field_label: Some(self.field_type.display_name().to_string()),
            options: None,
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_height_matches_declared_footprint() {
        let mut renderer = StaticRenderer::new(20.0);
        let content = renderer.create_field(FieldType::ShortText, GridRect::new(0, 1, 18, 5));
        assert_eq!(content.measured_pixel_height(), 100.0);
    }

    #[test]
    fn test_override_wins() {
        let mut renderer = StaticRenderer::new(20.0).with_height(FieldType::ShortText, 220.0);
        let content = renderer.create_field(FieldType::ShortText, GridRect::new(0, 1, 18, 5));
        assert_eq!(content.measured_pixel_height(), 220.0);
    }

    #[test]
    fn test_table_structure_exposes_rendered_columns() {
        let mut renderer = StaticRenderer::new(20.0);
        let content = renderer.create_field(FieldType::Table, GridRect::new(0, 1, 36, 8));
        let parsed = content.parse_structure();
        assert_eq!(parsed.columns.map(|c| c.len()), Some(3));
    }
}
