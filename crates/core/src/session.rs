//! Session-level editing API.
//!
//! This module ties the pipeline together: parse the pasted HTML, extract
//! and group its fields, accept keyed edits, and hand back export or
//! preview output. The main entry point is [`EditSession`].
//!
//! # Example
//!
//! ```rust
//! use copydeck_core::{EditOutcome, EditSession};
//!
//! let mut session = EditSession::new("<body><h1>Old title</h1></body>").unwrap();
//! let field_id = session.groups()[0].fields[0].id.clone();
//!
//! assert_eq!(session.set_field(&field_id, "New title"), EditOutcome::Applied);
//! assert!(session.export().contains("New title"));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Result;
use crate::document::EditableDocument;
use crate::extract::extract_fields;
use crate::field::{ContentField, FieldGroup, FieldProperty};
use crate::group::group_fields;
use crate::serialize::{render_preview, serialize_document};

/// URL schemes that must never land in a live attribute
static UNSAFE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(javascript|data|vbscript)\s*:").expect("valid regex"));

/// What happened to a single field edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was written to the document
    Applied,
    /// The value resolved to an unsafe URL scheme; the attribute was
    /// removed instead of being set
    Rejected,
    /// The field id did not resolve to a live element; nothing changed
    Stale,
}

/// One parse-edit-export cycle over a single document.
///
/// The session exclusively owns its document; edits mutate it in place
/// and a new session replaces it wholesale. All operations are
/// synchronous and idempotent, so an external scheduler may call
/// [`EditSession::preview`] at any cadence.
pub struct EditSession {
    document: EditableDocument,
    groups: Vec<FieldGroup>,
}

impl EditSession {
    /// Parse HTML and extract its editable fields, grouped.
    ///
    /// A session with zero groups is valid: it means the input parsed but
    /// contains nothing editable, which callers should surface as
    /// guidance rather than an error.
    pub fn new(html: &str) -> Result<Self> {
        let mut document = EditableDocument::parse(html)?;
        let fields = extract_fields(&mut document);
        let groups = group_fields(&document, fields);

        Ok(Self { document, groups })
    }

    /// The extracted field groups, general bucket first
    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    /// Whether extraction found anything to edit
    pub fn has_editable_content(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Whether the input contained an `<html>` tag
    pub fn is_full_document(&self) -> bool {
        self.document.is_full_document()
    }

    /// The underlying document
    pub fn document(&self) -> &EditableDocument {
        &self.document
    }

    /// Look up a field by its id
    pub fn field(&self, field_id: &str) -> Option<&ContentField> {
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .find(|field| field.id == field_id)
    }

    /// Apply one edit, keyed by field id.
    ///
    /// URL-bearing properties (`href`, `src`, `srcset`) whose new value
    /// resolves to a `javascript:`, `data:` or `vbscript:` scheme are
    /// never written; the attribute is removed entirely and the edit
    /// reports [`EditOutcome::Rejected`]. A field id that no longer
    /// resolves (replaced tree, malformed id) is a benign no-op.
    pub fn set_field(&mut self, field_id: &str, value: &str) -> EditOutcome {
        let Some((element_part, property_part)) = field_id.split_once('-') else {
            return EditOutcome::Stale;
        };
        let Ok(element_id) = element_part.parse::<usize>() else {
            return EditOutcome::Stale;
        };
        let Some(property) = FieldProperty::parse(property_part) else {
            return EditOutcome::Stale;
        };

        let outcome = match property.attr_name() {
            None => {
                if self.document.set_text(element_id, value) {
                    EditOutcome::Applied
                } else {
                    EditOutcome::Stale
                }
            }
            Some(attr) => {
                if property.is_url() && UNSAFE_URL.is_match(value) {
                    if self.document.remove_attr(element_id, attr) {
                        EditOutcome::Rejected
                    } else {
                        EditOutcome::Stale
                    }
                } else if self.document.set_attr(element_id, attr, value) {
                    EditOutcome::Applied
                } else {
                    EditOutcome::Stale
                }
            }
        };

        if outcome != EditOutcome::Stale {
            for group in &mut self.groups {
                for field in &mut group.fields {
                    if field.id == field_id {
                        field.value = value.to_string();
                    }
                }
            }
        }

        outcome
    }

    /// Apply a batch of edits in key order; returns how many reached the
    /// document (applied or rejected-and-removed)
    pub fn apply_edits(&mut self, edits: &BTreeMap<String, String>) -> usize {
        edits
            .iter()
            .filter(|(id, value)| self.set_field(id, value) != EditOutcome::Stale)
            .count()
    }

    /// Serialize the edited document for export
    pub fn export(&self) -> String {
        serialize_document(&self.document)
    }

    /// Render the sandboxed preview document
    pub fn preview(&self) -> Result<String> {
        render_preview(&self.document)
    }

    /// Capture the original input plus every changed field value
    pub fn snapshot(&self) -> SavedSession {
        let field_values = self
            .groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .filter(|field| !field.is_unchanged())
            .map(|field| (field.id.clone(), field.value.clone()))
            .collect();

        SavedSession {
            original_html: self.document.original_html().to_string(),
            field_values,
            timestamp: unix_millis(),
        }
    }

    /// Re-parse a saved session's original HTML and replay its edits.
    ///
    /// Works because element ids are assigned deterministically by the
    /// extraction walk, so a fresh parse of the same input reproduces the
    /// same field ids.
    pub fn restore(saved: &SavedSession) -> Result<Self> {
        let mut session = Self::new(&saved.original_html)?;
        session.apply_edits(&saved.field_values);
        Ok(session)
    }
}

/// Externally persisted session state, keyed by field id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    /// The exact HTML the session started from
    pub original_html: String,
    /// Changed field values, keyed by field id
    pub field_values: BTreeMap<String, String>,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp: u64,
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
