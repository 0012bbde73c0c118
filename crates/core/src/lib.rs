pub mod arena;
pub mod classify;
pub mod document;
pub mod error;
pub mod extract;
pub mod field;
pub mod group;
pub mod serialize;
pub mod session;

pub use arena::{ElementId, NodeArena};
pub use classify::{NodeCategory, classify, is_block_tag};
pub use document::EditableDocument;
pub use error::{CopydeckError, Result};
pub use extract::extract_fields;
pub use field::{ContentField, FieldGroup, FieldProperty, field_label};
pub use group::group_fields;
#[doc(hidden)]
pub use serialize::PREVIEW_CSP;
pub use serialize::{render_preview, serialize_document};
pub use session::{EditOutcome, EditSession, SavedSession};
