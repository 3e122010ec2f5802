//! # formgrid
//!
//! A two-level grid layout and packing engine for form builders.
//!
//! A form is a canvas of vertically stacked, full-width **sections**; each
//! section is an independently packed row space of **fields**. Fields are
//! dropped, resized, and edited interactively; sections auto-grow and
//! auto-shrink to fit their content; every structural edit cascades upward
//! so the canvas never corrupts — no overlap, no orphaned space, no
//! runaway growth. The whole layout serializes to a portable JSON document
//! that round-trips losslessly.
//!
//! ## Architecture
//!
//! ```text
//! user action (drop / resize / edit / delete)
//!       ↓
//!   [builder]  — FormBuilder: owned registries, the only mutation gateway
//!       ↓
//!   [layout]   — packing engine, section grids, canvas stacking
//!       ↓
//!   [model]    — field metadata + the portable JSON document
//! ```
//!
//! Rendering is a collaborator behind the [`render`] seam: the engine
//! hands it a field type and a rect, and asks the returned handle for its
//! rendered pixel height (after the environment's render pass settles) and
//! its visible structure. The engine never touches a DOM.

pub mod builder;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;
pub mod render;

pub use builder::FormBuilder;
pub use error::{FormGridError, FormGridResult};
pub use grid::{GridConfig, GridRect, WidthBuckets};
pub use model::document::{Document, ImportIssue, STORAGE_KEY};
pub use model::{FieldId, FieldMetadata, FieldSize, FieldType, FieldUpdate, SectionId};
pub use render::{FieldContent, FieldRenderer, StaticRenderer};

/// Re-layout a document described as JSON and return it normalized.
///
/// This is the headless entry point: parse leniently (skipping and
/// reporting malformed entries), rebuild the layout with the static
/// measurer, settle deferred measurements, and snapshot back to pretty
/// JSON.
pub fn normalize_json(json: &str, config: GridConfig) -> FormGridResult<(String, Vec<ImportIssue>)> {
    let renderer = StaticRenderer::new(config.cell_height_px);
    let mut builder = FormBuilder::new(config, Box::new(renderer));
    let issues = builder.import_json(json)?;
    builder.settle();
    Ok((builder.snapshot().to_json_pretty(), issues))
}
