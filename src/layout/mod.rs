//! # Two-Level Layout Engine
//!
//! The heart of formgrid. The canvas is a single-column stack of sections;
//! each section is an independently packed row space of fields. Every
//! structural edit flows the same way:
//!
//! 1. A section mutates its placement set through the packing engine
//! 2. The section recomputes its auto-fit height
//! 3. The canvas absorbs the new height, restacks, and repins the footer
//!
//! Nothing in this module allocates ids or owns metadata; the containers
//! here are pure placement state, driven exclusively by the form builder.

pub mod canvas;
pub mod packing;
pub mod section;

use crate::grid::GridRect;
use crate::model::{FieldId, SectionId};

/// A field's resolved position inside its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlacement {
    pub field_id: FieldId,
    pub section_id: SectionId,
    pub rect: GridRect,
}
