//! Banner-gated scan of the commented-out field declarations the schema
//! compiler leaves in the accessors section of a generated class.

use regex::Regex;

use crate::schema::FieldDescriptor;

/// Literal banner the schema compiler prints before the accessor
/// declarations of a message class.
const ACCESSOR_BANNER: &str =
    "// accessors -------------------------------------------------------";

/// Literal insertion-point marker that closes the class scope; scanning
/// stops here.
const CLASS_SCOPE_MARKER: &str = "// @@protoc_insertion_point(class_scope:";

/// Scan the accessors section only: field declarations of the shape
/// `// <type> <name> = <ordinal>;` between the banner and the class-scope
/// marker. Lines outside that window are never considered.
pub(super) fn scan(text: &str) -> Vec<FieldDescriptor> {
    let pattern = Regex::new(r"^\s*//\s*(\w+)\s+(\w+)\s*=\s*(\d+);").unwrap();

    let mut fields = Vec::new();
    let mut in_accessors = false;
    for line in text.lines() {
        if line.contains(ACCESSOR_BANNER) {
            in_accessors = true;
            continue;
        }
        if !in_accessors {
            continue;
        }
        if line.contains(CLASS_SCOPE_MARKER) {
            break;
        }
        if let Some(caps) = pattern.captures(line) {
            let Ok(ordinal) = caps[3].parse::<u32>() else {
                continue;
            };
            fields.push(FieldDescriptor::new(&caps[1], &caps[2], ordinal));
        }
    }
    fields
}
