//! Argument Sanitizer: checks model-proposed field projections against the
//! registry before any query is issued.

use tracing::debug;

use crate::query::split_fields;
use crate::schema::SchemaRegistry;

/// Outcome of checking a `fields` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    /// Every requested field is valid (or none were requested)
    Accepted { fields: String },
    /// Some fields were dropped; proceed with the rest and tell the model
    Trimmed {
        fields: String,
        dropped: Vec<String>,
        note: String,
    },
    /// Nothing valid was requested; the call must not be made
    Rejected { invalid: Vec<String>, note: String },
}

impl FieldCheck {
    /// Fields to send, `None` when the call is rejected
    pub fn fields(&self) -> Option<&str> {
        match self {
            FieldCheck::Accepted { fields } | FieldCheck::Trimmed { fields, .. } => Some(fields.as_str()),
            FieldCheck::Rejected { .. } => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            FieldCheck::Accepted { .. } => None,
            FieldCheck::Trimmed { note, .. } | FieldCheck::Rejected { note, .. } => Some(note.as_str()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, FieldCheck::Rejected { .. })
    }
}

/// Partitions `raw` into valid and invalid fields for `tool_name`.
pub fn sanitize_fields(registry: &SchemaRegistry, tool_name: &str, raw: &str) -> FieldCheck {
    let valid_set = registry.get_valid_fields(tool_name);
    let (valid, invalid): (Vec<String>, Vec<String>) = split_fields(raw)
        .into_iter()
        .partition(|field| valid_set.contains(field.as_str()));

    if invalid.is_empty() {
        return FieldCheck::Accepted {
            fields: valid.join(","),
        };
    }

    debug!(tool = tool_name, invalid = ?invalid, "Invalid fields requested");

    if valid.is_empty() {
        let note = format!(
            "CRITICAL: All requested fields were invalid and have been removed. The API call was not made. \
             Invalid fields: {}. You MUST use valid fields from the documentation.",
            invalid.join(", ")
        );
        return FieldCheck::Rejected { invalid, note };
    }

    let note = format!(
        "Note: The following requested fields are invalid for the '{}' tool and were removed: {}. \
         Please only use fields listed in the tool's documentation.",
        tool_name,
        invalid.join(", ")
    );
    FieldCheck::Trimmed {
        fields: valid.join(","),
        dropped: invalid,
        note,
    }
}
