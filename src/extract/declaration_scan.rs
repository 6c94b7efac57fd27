//! Unanchored scan for bare field declarations anywhere in the generated
//! text, with no banner or end-marker gating. The loose fallback shape.

use regex::Regex;

use crate::schema::FieldDescriptor;

/// Match `<type> <name> = <ordinal>;` on any line of the text, commented
/// or not.
pub(super) fn scan(text: &str) -> Vec<FieldDescriptor> {
    let pattern = Regex::new(r"(\w+)\s+(\w+)\s*=\s*(\d+);").unwrap();

    let mut fields = Vec::new();
    for line in text.lines() {
        for caps in pattern.captures_iter(line) {
            let Ok(ordinal) = caps[3].parse::<u32>() else {
                continue;
            };
            fields.push(FieldDescriptor::new(&caps[1], &caps[2], ordinal));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_scan_matches_without_banner() {
        let text = "string name = 1;\nint32 age = 2;\n";
        let fields = scan(text);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[1].name, "age");
        assert_eq!(fields[1].kind, FieldKind::Integer);
    }

    #[test]
    fn test_scan_matches_commented_declarations() {
        let text = "  // bool active = 3;\n";
        let fields = scan(text);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, FieldKind::Boolean);
        assert_eq!(fields[0].ordinal, 3);
    }

    #[test]
    fn test_scan_empty_text() {
        assert!(scan("").is_empty());
        assert!(scan("no declarations here\n").is_empty());
    }
}
