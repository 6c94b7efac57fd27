use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from field name to its textual value, supplied once per
/// serialization attempt. Keys are expected to be a subset of the active
/// [`SchemaFieldSet`] names; unknown keys are ignored.
pub type FieldValueMap = HashMap<String, String>;

/// Semantic kind assigned to a recovered field.
///
/// Unknown protocol type tokens collapse to [`FieldKind::Text`]; the
/// literal token survives in [`FieldDescriptor::proto_type`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl FieldKind {
    /// Map a protocol-level primitive type token to its semantic kind.
    pub fn from_proto_token(token: &str) -> Self {
        match token {
            "int32" | "int64" | "uint32" | "uint64" | "sint32" | "sint64" => FieldKind::Integer,
            "float" | "double" => FieldKind::Float,
            "bool" => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }
}

/// One field recovered from the generated artifact.
///
/// Read-only after extraction; the whole set is replaced wholesale when a
/// new schema is loaded.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// The literal protocol type token as it appeared in the artifact,
    /// e.g. `int32` or `string`.
    pub proto_type: String,
    /// Schema-declared field number.
    pub ordinal: u32,
}

impl FieldDescriptor {
    pub fn new(proto_type: impl Into<String>, name: impl Into<String>, ordinal: u32) -> Self {
        let proto_type = proto_type.into();
        let kind = FieldKind::from_proto_token(&proto_type);
        Self {
            name: name.into(),
            kind,
            proto_type,
            ordinal,
        }
    }
}

/// Ordered set of [`FieldDescriptor`]s, insertion order = discovery order
/// in the generated text. Field names are unique; the first occurrence
/// wins.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SchemaFieldSet {
    fields: Vec<FieldDescriptor>,
}

impl SchemaFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor, returning `false` (and dropping it) when a
    /// field with the same name is already present.
    pub fn push(&mut self, field: FieldDescriptor) -> bool {
        if self.contains(&field.name) {
            return false;
        }
        self.fields.push(field);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(FieldKind::from_proto_token("int32"), FieldKind::Integer);
        assert_eq!(FieldKind::from_proto_token("int64"), FieldKind::Integer);
        assert_eq!(FieldKind::from_proto_token("uint32"), FieldKind::Integer);
        assert_eq!(FieldKind::from_proto_token("uint64"), FieldKind::Integer);
        assert_eq!(FieldKind::from_proto_token("sint64"), FieldKind::Integer);
        assert_eq!(FieldKind::from_proto_token("float"), FieldKind::Float);
        assert_eq!(FieldKind::from_proto_token("double"), FieldKind::Float);
        assert_eq!(FieldKind::from_proto_token("bool"), FieldKind::Boolean);
        assert_eq!(FieldKind::from_proto_token("string"), FieldKind::Text);
        assert_eq!(FieldKind::from_proto_token("bytes"), FieldKind::Text);
        assert_eq!(FieldKind::from_proto_token("MyEnum"), FieldKind::Text);
    }

    #[test]
    fn test_descriptor_keeps_literal_token() {
        let field = FieldDescriptor::new("bytes", "payload", 4);
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.proto_type, "bytes");
        assert_eq!(field.ordinal, 4);
    }

    #[test]
    fn test_field_set_preserves_insertion_order() {
        let mut set = SchemaFieldSet::new();
        assert!(set.push(FieldDescriptor::new("string", "name", 1)));
        assert!(set.push(FieldDescriptor::new("int32", "age", 2)));
        assert!(set.push(FieldDescriptor::new("bool", "active", 3)));
        let names: Vec<&str> = set.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "age", "active"]);
    }

    #[test]
    fn test_field_set_first_occurrence_wins() {
        let mut set = SchemaFieldSet::new();
        assert!(set.push(FieldDescriptor::new("string", "name", 1)));
        assert!(!set.push(FieldDescriptor::new("int32", "name", 7)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("name").unwrap().ordinal, 1);
        assert_eq!(set.get("name").unwrap().kind, FieldKind::Text);
    }

    #[test]
    fn test_field_set_serializes_as_array() {
        let mut set = SchemaFieldSet::new();
        set.push(FieldDescriptor::new("int32", "age", 2));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "age", "kind": "integer", "proto_type": "int32", "ordinal": 2}
            ])
        );
    }
}
