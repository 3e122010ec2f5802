//! # Field Model
//!
//! The metadata side of the form: field types, size classes, per-field
//! settings, and the partial-update shape the settings panel submits.
//!
//! Every piece of per-type behavior — default settings, default footprint,
//! display label — lives on `impl FieldType`, so creation, settings reset,
//! and document parsing all dispatch through the same table instead of
//! re-matching on the type at every call site.

pub mod document;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::WidthBuckets;

/// Stable identifier for a field, unique across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn generate() -> Self {
        FieldId(format!("field-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        FieldId(s.to_string())
    }
}

/// Stable identifier for a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn generate() -> Self {
        SectionId(format!("section-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        SectionId(s.to_string())
    }
}

/// The form controls a field can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    ShortText,
    DropDownList,
    Checkbox,
    RadioGroup,
    Table,
    Label,
}

/// Column-width class of a field. Maps to concrete columns through the
/// canvas's [`WidthBuckets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

impl FieldSize {
    /// Concrete column width under the given bucket table.
    pub fn columns(self, buckets: &WidthBuckets) -> u32 {
        match self {
            FieldSize::Small => buckets.small,
            FieldSize::Medium => buckets.medium,
            FieldSize::Large => buckets.large,
            FieldSize::Full => buckets.full,
        }
    }

    /// The size class whose bucket width matches `columns`, if any.
    pub fn from_columns(columns: u32, buckets: &WidthBuckets) -> Option<FieldSize> {
        [
            FieldSize::Small,
            FieldSize::Medium,
            FieldSize::Large,
            FieldSize::Full,
        ]
        .into_iter()
        .find(|size| size.columns(buckets) == columns)
    }
}

/// Layout direction for choice groups (radio, checkbox).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// One selectable entry in a dropdown, radio group, or checkbox group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// One column of a table field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub header: String,
}

/// Everything editable about a field. Owned by the form builder and looked
/// up by `field_id`; the rendered side is a projection of this, never an
/// alternate authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub field_id: FieldId,
    pub field_type: FieldType,
    pub field_label: String,
    pub field_name: String,
    pub field_size: FieldSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_range: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_range: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ChoiceOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,
}

impl FieldType {
    /// Human-readable label used as the default field label.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::ShortText => "Text Field",
            FieldType::DropDownList => "Dropdown",
            FieldType::Checkbox => "Select Options",
            FieldType::RadioGroup => "Select an Option",
            FieldType::Table => "Table",
            FieldType::Label => "Label",
        }
    }

    /// Stem for generated `field_name`s ("short_text_3").
    pub fn name_stem(&self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::DropDownList => "drop_down",
            FieldType::Checkbox => "checkbox",
            FieldType::RadioGroup => "radio_group",
            FieldType::Table => "table",
            FieldType::Label => "label",
        }
    }

    /// Width class a freshly dropped field of this type occupies.
    pub fn default_size(&self) -> FieldSize {
        match self {
            FieldType::Table => FieldSize::Full,
            FieldType::Label => FieldSize::Small,
            _ => FieldSize::Medium,
        }
    }

    /// Row height of a freshly dropped field, before the rendered content
    /// is measured.
    pub fn default_rows(&self) -> u32 {
        match self {
            FieldType::Table => 8,
            FieldType::Label => 2,
            _ => 5,
        }
    }

    /// Default settings for a new field of this type. `ordinal` feeds the
    /// generated `field_name` so names stay unique within a session.
    pub fn default_metadata(&self, field_id: FieldId, ordinal: usize) -> FieldMetadata {
        let base = FieldMetadata {
            field_id,
            field_type: *self,
            field_label: self.display_name().to_string(),
            field_name: format!("{}_{}", self.name_stem(), ordinal),
            field_size: self.default_size(),
            placeholder_text: None,
            default_value: None,
            min_range: None,
            max_range: None,
            css_class: None,
            is_required: false,
            direction: None,
            options: None,
            columns: None,
        };

        match self {
            FieldType::ShortText => FieldMetadata {
                placeholder_text: Some(String::new()),
                default_value: Some(String::new()),
                min_range: Some(0),
                max_range: Some(0),
                ..base
            },
            FieldType::DropDownList | FieldType::Checkbox | FieldType::RadioGroup => {
                FieldMetadata {
                    options: Some(vec![
                        ChoiceOption::new("Option 1", "option1"),
                        ChoiceOption::new("Option 2", "option2"),
                    ]),
                    direction: Some(Direction::Vertical),
                    ..base
                }
            }
            FieldType::Table => FieldMetadata {
                columns: Some(vec![]),
                ..base
            },
            FieldType::Label => base,
        }
    }
}

/// A partial settings update from the panel. Absent fields keep their
/// current values (merge-patch semantics).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldUpdate {
    pub field_label: Option<String>,
    pub field_name: Option<String>,
    pub field_size: Option<FieldSize>,
    pub placeholder_text: Option<String>,
    pub default_value: Option<String>,
    pub min_range: Option<u32>,
    pub max_range: Option<u32>,
    pub css_class: Option<String>,
    pub is_required: Option<bool>,
    pub direction: Option<Direction>,
    pub options: Option<Vec<ChoiceOption>>,
    pub columns: Option<Vec<TableColumn>>,
}

impl FieldMetadata {
    /// Merge a partial update into these settings. Returns true when the
    /// size class changed, which is the caller's cue to re-resolve the
    /// field's column width.
    pub fn apply(&mut self, update: &FieldUpdate) -> bool {
        let mut size_changed = false;

        if let Some(label) = &update.field_label {
            self.field_label = label.clone();
        }
        if let Some(name) = &update.field_name {
            self.field_name = name.clone();
        }
        if let Some(size) = update.field_size {
            size_changed = size != self.field_size;
            self.field_size = size;
        }
        if let Some(placeholder) = &update.placeholder_text {
            self.placeholder_text = Some(placeholder.clone());
        }
        if let Some(default_value) = &update.default_value {
            self.default_value = Some(default_value.clone());
        }
        if let Some(min) = update.min_range {
            self.min_range = Some(min);
        }
        if let Some(max) = update.max_range {
            self.max_range = Some(max);
        }
        if let Some(css) = &update.css_class {
            self.css_class = Some(css.clone());
        }
        if let Some(required) = update.is_required {
            self.is_required = required;
        }
        if let Some(direction) = update.direction {
            self.direction = Some(direction);
        }
        if let Some(options) = &update.options {
            self.options = Some(options.clone());
        }
        if let Some(columns) = &update.columns {
            self.columns = Some(columns.clone());
        }

        size_changed
    }
}
