//! Structured error types for the formgrid layout engine.
//!
//! Four variants cover the real failure sources: a missing section, a
//! missing field on an operation that cannot tolerate one, a placement
//! request the grid cannot hold, and a document that fails to parse.
//! Nothing in here is fatal to an interactive session; every variant is a
//! rejected operation that leaves the model in its last consistent state.

use crate::model::{FieldId, SectionId};

pub type FormGridResult<T> = Result<T, FormGridError>;

#[derive(thiserror::Error, Debug)]
pub enum FormGridError {
    /// An operation referenced a section id no longer present.
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    /// A settings update referenced a field id that does not exist.
    /// Removal and resize of unknown fields are silent no-ops instead.
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    /// A placement request the grid cannot hold (e.g. wider than the
    /// column count). Rejected before any state is mutated.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A document failed to parse or validate during import.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl FormGridError {
    pub fn invalid_placement(msg: impl Into<String>) -> Self {
        Self::InvalidPlacement(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }
}

impl From<serde_json::Error> for FormGridError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                " (check for trailing commas, missing quotes, or unescaped characters)"
            }
            serde_json::error::Category::Data => {
                " (the JSON is valid but doesn't match the document schema)"
            }
            serde_json::error::Category::Eof => " (unexpected end of input — is the JSON truncated?)",
            serde_json::error::Category::Io => "",
        };
        FormGridError::MalformedDocument(format!("{}{}", e, hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionId;

    #[test]
    fn display_prefixes_are_stable() {
        let err = FormGridError::SectionNotFound(SectionId::from("section-1"));
        assert!(err.to_string().contains("section not found:"));
        assert!(
            FormGridError::invalid_placement("x")
                .to_string()
                .contains("invalid placement:")
        );
    }

    #[test]
    fn json_errors_carry_a_hint() {
        let bad = serde_json::from_str::<serde_json::Value>("[1,");
        let err: FormGridError = bad.unwrap_err().into();
        assert!(err.to_string().contains("truncated") || err.to_string().contains("trailing"));
    }
}
