//! Field-level data model recovered from the generated artifact, plus
//! helpers over the raw schema text.

pub mod field;
pub mod proto_text;

pub use field::{FieldDescriptor, FieldKind, FieldValueMap, SchemaFieldSet};
pub use proto_text::message_full_name;
