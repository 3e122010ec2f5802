//! # Form Builder
//!
//! The root of the model and the only mutation gateway. Owns the canvas,
//! every section's packing state, all field metadata, and the content
//! handles the rendering collaborator returns — explicit registries keyed
//! by id, never reconstructed from rendered output.
//!
//! ## Mutation flow
//!
//! ```text
//! user action (add section / drop field / resize / edit / delete)
//!       ↓
//! FormBuilder op — validates, mutates exactly one section or the canvas
//!       ↓
//! section auto-fit → canvas restack → footer repin   (synchronous)
//!       ↓
//! settle() — deferred re-measurement, after the render pass   (next tick)
//! ```
//!
//! `settle()` is the cooperative yield point: the environment calls it
//! once its render pass is done and strictly before the next user
//! mutation. A queued field that was deleted in the meantime is skipped,
//! never an error.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument, warn};

use crate::error::{FormGridError, FormGridResult};
use crate::grid::GridConfig;
use crate::layout::canvas::CanvasGrid;
use crate::layout::section::SectionGrid;
use crate::layout::FieldPlacement;
use crate::model::document::{Document, FieldDoc, ImportIssue, SectionDoc};
use crate::model::{FieldId, FieldMetadata, FieldSize, FieldType, FieldUpdate, SectionId};
use crate::render::{FieldContent, FieldRenderer};

pub struct FormBuilder {
    config: GridConfig,
    canvas: CanvasGrid,
    sections: HashMap<SectionId, SectionGrid>,
    metadata: HashMap<FieldId, FieldMetadata>,
    content: HashMap<FieldId, Box<dyn FieldContent>>,
    /// Reverse index: which section owns each field.
    owner: HashMap<FieldId, SectionId>,
    renderer: Box<dyn FieldRenderer>,
    /// Fields whose rendered height must be re-sampled at the next
    /// settle(), in schedule order.
    pending_measure: VecDeque<FieldId>,
    field_ordinal: usize,
}

impl FormBuilder {
    pub fn new(config: GridConfig, renderer: Box<dyn FieldRenderer>) -> Self {
        Self {
            canvas: CanvasGrid::new(config.clone()),
            config,
            sections: HashMap::new(),
            metadata: HashMap::new(),
            content: HashMap::new(),
            owner: HashMap::new(),
            renderer,
            pending_measure: VecDeque::new(),
            field_ordinal: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    // ── Sections ────────────────────────────────────────────────────

    /// Add an empty section below all existing content.
    pub fn add_section(&mut self) -> SectionId {
        let section_id = SectionId::generate();
        self.canvas.push_section(section_id.clone());
        self.sections.insert(
            section_id.clone(),
            SectionGrid::new(section_id.clone(), self.config.clone()),
        );
        debug!(section = %section_id, "added section");
        section_id
    }

    /// Install the pinned canvas header. Returns the existing header's id
    /// when one is already installed.
    pub fn add_header(&mut self) -> SectionId {
        if let Some(existing) = self.canvas.header_id() {
            return existing.clone();
        }
        let section_id = SectionId::generate();
        self.canvas.install_header(section_id.clone());
        self.sections.insert(
            section_id.clone(),
            SectionGrid::new(section_id.clone(), self.config.clone()),
        );
        section_id
    }

    /// Install the pinned canvas footer. Returns the existing footer's id
    /// when one is already installed.
    pub fn add_footer(&mut self) -> SectionId {
        if let Some(existing) = self.canvas.footer_id() {
            return existing.clone();
        }
        let section_id = SectionId::generate();
        self.canvas.install_footer(section_id.clone());
        self.sections.insert(
            section_id.clone(),
            SectionGrid::new(section_id.clone(), self.config.clone()),
        );
        section_id
    }

    /// Remove a section and everything in it: placements, metadata,
    /// content handles. Later sections move up through canvas compaction.
    #[instrument(skip(self))]
    pub fn remove_section(&mut self, section_id: &SectionId) -> FormGridResult<()> {
        let grid = self
            .sections
            .remove(section_id)
            .ok_or_else(|| FormGridError::SectionNotFound(section_id.clone()))?;

        for placement in grid.placements() {
            self.metadata.remove(&placement.field_id);
            self.content.remove(&placement.field_id);
            self.owner.remove(&placement.field_id);
        }
        self.canvas.remove_section(section_id);
        debug!(section = %section_id, fields = grid.placements().len(), "removed section");
        Ok(())
    }

    // ── Fields ──────────────────────────────────────────────────────

    /// Drop a new field of `field_type` into a section. The placement
    /// comes from the packing engine; the settings come from the type's
    /// defaults; the rendered height is re-sampled at the next settle().
    #[instrument(skip(self))]
    pub fn add_field(
        &mut self,
        section_id: &SectionId,
        field_type: FieldType,
    ) -> FormGridResult<FieldId> {
        if !self.sections.contains_key(section_id) {
            return Err(FormGridError::SectionNotFound(section_id.clone()));
        }

        self.field_ordinal += 1;
        let field_id = FieldId::generate();
        let metadata = field_type.default_metadata(field_id.clone(), self.field_ordinal);
        let w = metadata.field_size.columns(&self.config.buckets);
        let h = field_type.default_rows();

        let placement = self
            .sections
            .get_mut(section_id)
            .ok_or_else(|| FormGridError::SectionNotFound(section_id.clone()))?
            .place_field(field_id.clone(), w, h)?;

        let content = self.renderer.create_field(field_type, placement.rect);
        self.metadata.insert(field_id.clone(), metadata);
        self.content.insert(field_id.clone(), content);
        self.owner.insert(field_id.clone(), section_id.clone());
        self.pending_measure.push_back(field_id.clone());

        self.refit_section(section_id);
        Ok(field_id)
    }

    /// Remove a field. Unknown ids are a silent no-op (idempotent
    /// delete).
    pub fn remove_field(&mut self, field_id: &FieldId) {
        let Some(section_id) = self.owner.remove(field_id) else {
            return;
        };
        if let Some(grid) = self.sections.get_mut(&section_id) {
            grid.remove_field(field_id);
        }
        self.metadata.remove(field_id);
        self.content.remove(field_id);
        self.refit_section(&section_id);
    }

    /// Resize a field by drag. Widths snap to the nearest bucket; a width
    /// wider than the grid is rejected before any state changes. Unknown
    /// ids are a silent no-op.
    pub fn resize_field(
        &mut self,
        field_id: &FieldId,
        width: Option<u32>,
        height: Option<u32>,
    ) -> FormGridResult<()> {
        let Some(section_id) = self.owner.get(field_id).cloned() else {
            return Ok(());
        };
        let Some(grid) = self.sections.get_mut(&section_id) else {
            return Ok(());
        };

        let Some(rect) = grid.set_field_size(field_id, width, height)? else {
            return Ok(());
        };

        // Keep the tracked size class in step with the snapped width.
        if width.is_some() {
            if let Some(size) = FieldSize::from_columns(rect.w, &self.config.buckets) {
                if let Some(meta) = self.metadata.get_mut(field_id) {
                    meta.field_size = size;
                }
            }
        }

        self.refit_section(&section_id);
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn field_metadata(&self, field_id: &FieldId) -> Option<&FieldMetadata> {
        self.metadata.get(field_id)
    }

    /// Merge a partial settings update into a field. Unlike removal,
    /// updating a field that does not exist is an error: there is nothing
    /// to apply the settings to.
    pub fn apply_field_update(
        &mut self,
        field_id: &FieldId,
        update: &FieldUpdate,
    ) -> FormGridResult<()> {
        let meta = self
            .metadata
            .get_mut(field_id)
            .ok_or_else(|| FormGridError::FieldNotFound(field_id.clone()))?;

        let size_changed = meta.apply(update);
        let new_width = meta.field_size.columns(&self.config.buckets);

        if size_changed {
            if let Some(section_id) = self.owner.get(field_id).cloned() {
                if let Some(grid) = self.sections.get_mut(&section_id) {
                    grid.set_field_size(field_id, Some(new_width), None)?;
                }
                self.refit_section(&section_id);
            }
        }

        // The rendered footprint may change for any edit (label length,
        // option count), so re-sample at the next settle().
        self.pending_measure.push_back(field_id.clone());
        Ok(())
    }

    // ── Deferred re-measurement ─────────────────────────────────────

    /// Drain the deferred re-measurement queue. Called by the environment
    /// after its render pass has settled and before the next user
    /// mutation. Fields removed since they were queued are skipped.
    #[instrument(skip(self))]
    pub fn settle(&mut self) {
        while let Some(field_id) = self.pending_measure.pop_front() {
            let Some(section_id) = self.owner.get(&field_id).cloned() else {
                continue; // deleted before its re-measurement ran
            };
            let Some(pixel_height) = self.content.get(&field_id).map(|c| c.measured_pixel_height())
            else {
                continue;
            };

            let rows = self.config.rows_for_pixels(pixel_height).max(1);
            let current = self
                .sections
                .get(&section_id)
                .and_then(|g| g.placement(&field_id))
                .map(|p| p.rect.h);
            if current == Some(rows) {
                continue;
            }

            debug!(field = %field_id, rows, "re-measured field height");
            if let Some(grid) = self.sections.get_mut(&section_id) {
                // Height-only change on a live field cannot fail.
                if grid.set_field_size(&field_id, None, Some(rows)).is_err() {
                    continue;
                }
            }
            self.refit_section(&section_id);
        }
    }

    /// Queue length, exposed for hosts that want to skip a settle pass.
    pub fn has_pending_measurements(&self) -> bool {
        !self.pending_measure.is_empty()
    }

    // ── Snapshot / restore ──────────────────────────────────────────

    /// Snapshot the whole form into a portable document: sections in
    /// stacking order, fields in placement order, tracked settings merged
    /// over the rendered projection. The result is a deep copy, fully
    /// independent of the live model.
    pub fn snapshot(&self) -> Document {
        let mut sections = Vec::new();
        for section_id in self.canvas.ordered_ids() {
            let Some(grid) = self.sections.get(&section_id) else {
                continue;
            };
            let mut fields = Vec::new();
            for placement in grid.placements() {
                let Some(mut settings) = self.metadata.get(&placement.field_id).cloned() else {
                    continue;
                };
                if let Some(content) = self.content.get(&placement.field_id) {
                    settings.merge_parsed(&content.parse_structure());
                }
                fields.push(FieldDoc {
                    field_id: placement.field_id.clone(),
                    field_settings: settings,
                });
            }
            sections.push(SectionDoc {
                section_id: section_id.clone(),
                fields,
            });
        }
        Document { sections }
    }

    /// Rebuild the whole form from a document. Ids are preserved, never
    /// regenerated; a duplicate field id keeps its first occurrence.
    /// Placements are recomputed from each field's size class and type
    /// defaults, then refined by the next settle().
    #[instrument(skip(self, document))]
    pub fn restore(&mut self, document: &Document) -> FormGridResult<()> {
        self.canvas = CanvasGrid::new(self.config.clone());
        self.sections.clear();
        self.metadata.clear();
        self.content.clear();
        self.owner.clear();
        self.pending_measure.clear();

        for section in &document.sections {
            if self.sections.contains_key(&section.section_id) {
                warn!(section = %section.section_id, "duplicate section id skipped");
                continue;
            }
            self.canvas.push_section(section.section_id.clone());
            let mut grid = SectionGrid::new(section.section_id.clone(), self.config.clone());

            for field in &section.fields {
                if self.metadata.contains_key(&field.field_id) {
                    warn!(field = %field.field_id, "duplicate field id skipped");
                    continue;
                }
                let mut settings = field.field_settings.clone();
                settings.field_id = field.field_id.clone();

                let w = settings.field_size.columns(&self.config.buckets);
                let h = settings.field_type.default_rows();
                let placement = match grid.place_field(field.field_id.clone(), w, h) {
                    Ok(placement) => placement,
                    Err(e) => {
                        warn!(field = %field.field_id, error = %e, "unplaceable field skipped");
                        continue;
                    }
                };

                let content = self.renderer.create_field(settings.field_type, placement.rect);
                self.metadata.insert(field.field_id.clone(), settings);
                self.content.insert(field.field_id.clone(), content);
                self.owner
                    .insert(field.field_id.clone(), section.section_id.clone());
                self.pending_measure.push_back(field.field_id.clone());
                self.field_ordinal += 1;
            }

            self.sections.insert(section.section_id.clone(), grid);
            self.refit_section(&section.section_id);
        }

        Ok(())
    }

    /// Lenient end-to-end import: parse, skip-and-report malformed
    /// entries, rebuild. Returns the issues for the caller to surface.
    pub fn import_json(&mut self, json: &str) -> FormGridResult<Vec<ImportIssue>> {
        let (document, issues) = Document::from_json_lenient(json)?;
        self.restore(&document)?;
        Ok(issues)
    }

    // ── Read access ─────────────────────────────────────────────────

    /// Section ids in stacking order (pinned header first, footer last).
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.canvas.ordered_ids()
    }

    /// A section's current canvas height in rows.
    pub fn section_height(&self, section_id: &SectionId) -> FormGridResult<u32> {
        self.canvas
            .slot(section_id)
            .map(|s| s.rect.h)
            .ok_or_else(|| FormGridError::SectionNotFound(section_id.clone()))
    }

    /// A section's vertical position on the canvas.
    pub fn section_y(&self, section_id: &SectionId) -> FormGridResult<u32> {
        self.canvas
            .slot(section_id)
            .map(|s| s.rect.y)
            .ok_or_else(|| FormGridError::SectionNotFound(section_id.clone()))
    }

    /// A section's field placements in insertion order.
    pub fn placements(&self, section_id: &SectionId) -> FormGridResult<&[FieldPlacement]> {
        self.sections
            .get(section_id)
            .map(|g| g.placements())
            .ok_or_else(|| FormGridError::SectionNotFound(section_id.clone()))
    }

    pub fn field_count(&self) -> usize {
        self.metadata.len()
    }

    // ── Internal cascade ────────────────────────────────────────────

    /// Field change → section auto-fit → canvas restack → footer repin.
    fn refit_section(&mut self, section_id: &SectionId) {
        if let Some(height) = self.sections.get(section_id).map(|g| g.auto_fit_height()) {
            self.canvas.set_section_height(section_id, height);
        }
    }
}
