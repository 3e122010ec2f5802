//! # Portable Document
//!
//! The serialized snapshot of the whole form: a JSON array of sections,
//! each carrying its fields and their settings in order. This is the only
//! wire format the engine speaks; the preview renderer, export download,
//! and storage round-trip all consume it.
//!
//! Import comes in two strengths. [`Document::from_json`] is strict and
//! fails on the first schema violation. [`Document::from_json_lenient`]
//! implements the partial-success policy: an entry missing required fields
//! is skipped and reported as an [`ImportIssue`], and the rest of the
//! document still loads.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FormGridError, FormGridResult};
use crate::model::{ChoiceOption, FieldId, FieldMetadata, FieldType, SectionId, TableColumn};

/// Conventional storage key collaborators use for round-trip persistence.
pub const STORAGE_KEY: &str = "form-sections";

/// A complete exported form: sections in stacking order.
///
/// Serializes as a bare JSON array, matching the shape persisted under
/// [`STORAGE_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub sections: Vec<SectionDoc>,
}

/// One section's slice of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDoc {
    pub section_id: SectionId,
    pub fields: Vec<FieldDoc>,
}

/// One field's slice of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDoc {
    pub field_id: FieldId,
    pub field_settings: FieldMetadata,
}

/// A skipped entry from a lenient import: where it sat and why it was
/// dropped.
#[derive(Debug, Clone)]
pub struct ImportIssue {
    pub path: String,
    pub reason: String,
}

impl Document {
    /// Strict parse. Any schema violation fails the whole load.
    pub fn from_json(json: &str) -> FormGridResult<Document> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lenient parse: malformed section or field entries are skipped and
    /// reported, everything else loads. The outer value must still be a
    /// JSON array.
    pub fn from_json_lenient(json: &str) -> FormGridResult<(Document, Vec<ImportIssue>)> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let entries = value
            .as_array()
            .ok_or_else(|| FormGridError::malformed("top-level value is not an array"))?;

        let mut sections = Vec::with_capacity(entries.len());
        let mut issues = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            match salvage_section(entry, i, &mut issues) {
                Some(section) => sections.push(section),
                None => issues.push(ImportIssue {
                    path: format!("[{}]", i),
                    reason: "section entry missing sectionId".to_string(),
                }),
            }
        }

        for issue in &issues {
            warn!(path = %issue.path, reason = %issue.reason, "skipped document entry");
        }

        Ok((Document { sections }, issues))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Pull whatever valid fields an entry holds. Returns None when the entry
/// has no usable section id at all.
fn salvage_section(
    entry: &serde_json::Value,
    index: usize,
    issues: &mut Vec<ImportIssue>,
) -> Option<SectionDoc> {
    let section_id = entry.get("sectionId")?.as_str()?;

    let mut fields = Vec::new();
    if let Some(raw_fields) = entry.get("fields").and_then(|f| f.as_array()) {
        for (j, raw) in raw_fields.iter().enumerate() {
            match serde_json::from_value::<FieldDoc>(raw.clone()) {
                Ok(field) => fields.push(field),
                Err(e) => issues.push(ImportIssue {
                    path: format!("[{}].fields[{}]", index, j),
                    reason: e.to_string(),
                }),
            }
        }
    }

    Some(SectionDoc {
        section_id: SectionId::from(section_id),
        fields,
    })
}

/// Structural attributes parsed back from a field's rendered content.
///
/// This is the read-only projection the rendering collaborator exposes.
/// During [`snapshot`](crate::builder::FormBuilder::snapshot) it fills only
/// attributes the tracked settings leave empty; tracked edits always win on
/// conflict.
#[derive(Debug, Clone, Default)]
pub struct ParsedStructure {
    pub field_type: Option<FieldType>,
    pub field_label: Option<String>,
    pub options: Option<Vec<ChoiceOption>>,
    pub columns: Option<Vec<TableColumn>>,
}

impl FieldMetadata {
    /// Fill untracked attributes from the rendered projection. Explicit
    /// settings take precedence; only empty slots are filled.
    pub fn merge_parsed(&mut self, parsed: &ParsedStructure) {
        if self.field_label.is_empty() {
            if let Some(label) = &parsed.field_label {
                self.field_label = label.clone();
            }
        }
        if self.options.is_none() {
            self.options = parsed.options.clone();
        }
        if self.columns.is_none() {
            self.columns = parsed.columns.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldSize;

    fn sample_json() -> String {
        let doc = Document {
            sections: vec![SectionDoc {
                section_id: SectionId::from("section-a"),
                fields: vec![FieldDoc {
                    field_id: FieldId::from("field-1"),
                    field_settings: FieldType::ShortText
                        .default_metadata(FieldId::from("field-1"), 1),
                }],
            }],
        };
        doc.to_json()
    }

    #[test]
    fn test_strict_round_trip() {
        let json = sample_json();
        let doc = Document::from_json(&json).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].fields.len(), 1);
        assert_eq!(Document::from_json(&doc.to_json()).unwrap(), doc);
    }

    #[test]
    fn test_wire_format_is_camel_case_array() {
        let json = sample_json();
        assert!(json.starts_with('['));
        assert!(json.contains("\"sectionId\""));
        assert!(json.contains("\"fieldSettings\""));
        assert!(json.contains("\"fieldType\":\"shortText\""));
    }

    #[test]
    fn test_strict_rejects_non_array() {
        let err = Document::from_json("{\"sectionId\":\"s\"}").unwrap_err();
        assert!(err.to_string().contains("malformed document"));
    }

    #[test]
    fn test_lenient_skips_bad_entries_and_reports() {
        let json = r#"[
            { "sectionId": "section-a",
              "fields": [
                { "fieldId": "f1",
                  "fieldSettings": { "fieldId": "f1", "fieldType": "shortText",
                                     "fieldLabel": "A", "fieldName": "a",
                                     "fieldSize": "medium" } },
                { "fieldId": "f2" }
              ] },
            { "fields": [] },
            { "sectionId": "section-b", "fields": [] }
        ]"#;

        let (doc, issues) = Document::from_json_lenient(json).unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].fields.len(), 1);
        assert_eq!(doc.sections[1].section_id, SectionId::from("section-b"));
        // One missing fieldSettings, one missing sectionId.
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_lenient_rejects_non_array_outer() {
        assert!(Document::from_json_lenient("42").is_err());
    }

    #[test]
    fn test_merge_parsed_fills_only_empty_slots() {
        let mut meta = FieldType::DropDownList.default_metadata(FieldId::from("f"), 1);
        meta.field_label = String::new();
        let tracked_options = meta.options.clone();

        let parsed = ParsedStructure {
            field_type: Some(FieldType::DropDownList),
            field_label: Some("Parsed label".to_string()),
            options: Some(vec![ChoiceOption::new("x", "x")]),
            columns: None,
        };
        meta.merge_parsed(&parsed);

        assert_eq!(meta.field_label, "Parsed label");
        // Tracked options win over the parsed ones.
        assert_eq!(meta.options, tracked_options);
        assert_eq!(meta.field_size, FieldSize::Medium);
    }
}
