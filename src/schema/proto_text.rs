//! Helpers over the user-authored schema text.
//!
//! The generated glue source must name the concrete message type, and the
//! schema compiler emits no structured metadata, so the fully-qualified
//! name is recovered from the schema text itself: the `package`
//! declaration (if any) plus the first `message` declaration.

use regex::Regex;

/// Fully-qualified name of the first message declared in the schema text,
/// in the dotted form the descriptor pool expects (`package.Message`).
/// `None` when the text declares no message.
pub fn message_full_name(schema: &str) -> Option<String> {
    let package_re = Regex::new(r"\bpackage\s+([A-Za-z_][A-Za-z0-9_.]*)\s*;").unwrap();
    let message_re = Regex::new(r"\bmessage\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();

    let mut package: Option<String> = None;
    for line in schema.lines() {
        let line = strip_line_comment(line);
        if package.is_none() {
            if let Some(caps) = package_re.captures(line) {
                package = Some(caps[1].to_string());
            }
        }
        if let Some(caps) = message_re.captures(line) {
            let name = &caps[1];
            return Some(match &package {
                Some(pkg) => format!("{pkg}.{name}"),
                None => name.to_string(),
            });
        }
    }
    None
}

fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_package() {
        let schema = r#"
syntax = "proto3";
package example;

message Person {
  string name = 1;
}
"#;
        assert_eq!(message_full_name(schema).as_deref(), Some("example.Person"));
    }

    #[test]
    fn test_message_without_package() {
        let schema = "syntax = \"proto3\";\nmessage Ping {\n  int32 seq = 1;\n}\n";
        assert_eq!(message_full_name(schema).as_deref(), Some("Ping"));
    }

    #[test]
    fn test_nested_package_path() {
        let schema = "package com.example.api;\nmessage Event {}\n";
        assert_eq!(
            message_full_name(schema).as_deref(),
            Some("com.example.api.Event")
        );
    }

    #[test]
    fn test_first_message_wins() {
        let schema = "package p;\nmessage First {}\nmessage Second {}\n";
        assert_eq!(message_full_name(schema).as_deref(), Some("p.First"));
    }

    #[test]
    fn test_no_message_declaration() {
        assert_eq!(message_full_name("syntax = \"proto3\";\n"), None);
        assert_eq!(message_full_name(""), None);
    }

    #[test]
    fn test_commented_out_message_ignored() {
        let schema = "// message Ghost {}\npackage p;\nmessage Real {}\n";
        assert_eq!(message_full_name(schema).as_deref(), Some("p.Real"));
    }

    #[test]
    fn test_single_line_schema() {
        let schema = "syntax = \"proto3\"; package example; message Person { string name = 1; }";
        assert_eq!(message_full_name(schema).as_deref(), Some("example.Person"));
    }
}
