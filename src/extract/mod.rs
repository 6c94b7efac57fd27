//! Artifact Field Extractor.
//!
//! The schema compiler emits source code, not structured metadata, so the
//! field schema is recovered by line-oriented pattern matching against the
//! generated text. Two independently tested strategies exist:
//!
//! 1. [`ExtractionStrategy::AccessorComments`] (default) — declarations of
//!    the shape `// <type> <name> = <ordinal>;` inside the accessors
//!    section of the generated class, bounded by literal markers.
//! 2. [`ExtractionStrategy::BareDeclarations`] — the same declaration
//!    shape anywhere in the text, with no section gating.
//!
//! An empty result is not an extractor error; the orchestrator reports it
//! as a user-visible diagnostic and awaits a differently-shaped artifact.

mod accessor_scan;
mod declaration_scan;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaFieldSet;

/// Named, swappable extraction strategies. A future structured-metadata
/// source slots in as another variant without touching the pipeline.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Bounded scan of the commented accessor declarations.
    #[default]
    AccessorComments,
    /// Unanchored scan of bare declarations anywhere in the text.
    BareDeclarations,
}

/// Outcome of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub fields: SchemaFieldSet,
    /// Names that appeared more than once; the first occurrence won and
    /// the later ones were dropped.
    pub duplicates: Vec<String>,
}

/// Recover an ordered field set from the full generated-artifact text
/// (header and source concatenated).
pub fn extract_fields(text: &str, strategy: ExtractionStrategy) -> ExtractionReport {
    let raw = match strategy {
        ExtractionStrategy::AccessorComments => accessor_scan::scan(text),
        ExtractionStrategy::BareDeclarations => declaration_scan::scan(text),
    };

    let mut report = ExtractionReport::default();
    for field in raw {
        let name = field.name.clone();
        if !report.fields.push(field) {
            tracing::warn!("duplicate field name '{name}' dropped, first occurrence wins");
            report.duplicates.push(name);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    const GENERATED: &str = "\
class Person final {
// accessors -------------------------------------------------------
  // string name = 1;
  void clear_name();
  // int32 age = 2;
  void clear_age();
// @@protoc_insertion_point(class_scope:example.Person)
};
";

    #[test]
    fn test_accessor_strategy_is_default() {
        assert_eq!(
            ExtractionStrategy::default(),
            ExtractionStrategy::AccessorComments
        );
    }

    #[test]
    fn test_extract_with_default_strategy() {
        let report = extract_fields(GENERATED, ExtractionStrategy::AccessorComments);
        assert_eq!(report.fields.len(), 2);
        assert!(report.duplicates.is_empty());
        assert_eq!(report.fields.get("age").unwrap().kind, FieldKind::Integer);
    }

    #[test]
    fn test_extract_zero_matches_is_empty_not_error() {
        let report = extract_fields("int main() { return 0; }\n", ExtractionStrategy::AccessorComments);
        assert!(report.fields.is_empty());
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn test_duplicate_names_first_wins_and_reported() {
        let text = "\
// accessors -------------------------------------------------------
  // string name = 1;
  // int32 name = 5;
  // bool active = 2;
";
        let report = extract_fields(text, ExtractionStrategy::AccessorComments);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.fields.get("name").unwrap().ordinal, 1);
        assert_eq!(report.fields.get("name").unwrap().kind, FieldKind::Text);
        assert_eq!(report.duplicates, vec!["name".to_string()]);
    }

    #[test]
    fn test_bare_strategy_needs_no_banner() {
        let text = "string title = 1;\ndouble ratio = 2;\n";
        let report = extract_fields(text, ExtractionStrategy::BareDeclarations);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.fields.get("ratio").unwrap().kind, FieldKind::Float);
    }

    #[test]
    fn test_strategy_serde_round_trip() {
        let json = serde_json::to_string(&ExtractionStrategy::BareDeclarations).unwrap();
        assert_eq!(json, "\"bare_declarations\"");
        let back: ExtractionStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ExtractionStrategy::BareDeclarations);
    }
}
