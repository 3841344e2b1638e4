//! Generic text rendering of response objects
//!
//! Responses are serialized to a `serde_json::Value` and walked in field
//! declaration order. Scalars become `Label: value` lines, nested records
//! become indented blocks and lists of records become tables.

use comfy_table::{Table, presets};
use serde::Serialize;
use serde_json::{Map, Value};

const INDENT: usize = 2;

/// Render any serializable response as text lines
pub fn render_text<T: Serialize + ?Sized>(value: &T) -> Result<Vec<String>, serde_json::Error> {
    Ok(render_value(&serde_json::to_value(value)?))
}

pub fn render_value(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) => render_record(map, 0, &mut lines),
        Value::Array(items) if items.iter().any(Value::is_object) => {
            lines.extend(table(items).to_string().lines().map(str::to_string));
        }
        Value::Array(items) => {
            lines.extend(items.iter().map(cell_text).filter(|s| !s.is_empty()));
        }
        other => {
            if !is_blank(other) {
                lines.push(cell_text(other));
            }
        }
    }
    lines
}

/// Whether a response carries nothing worth showing
///
/// `false`, `0`, empty strings, empty lists and `null` all count as empty;
/// a record is empty when every field is.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(is_empty),
    }
}

/// Whether a field is skipped in text output
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(is_blank),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn render_record(map: &Map<String, Value>, indent: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(indent);

    for (name, value) in map {
        if is_blank(value) {
            continue;
        }

        let label = label(name);
        match value {
            Value::Object(inner) => {
                lines.push(format!("{pad}{label}:"));
                render_record(inner, indent + INDENT, lines);
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {
                lines.push(format!("{pad}{label}:"));
                let inner_pad = " ".repeat(indent + INDENT);
                lines.extend(
                    table(items)
                        .to_string()
                        .lines()
                        .map(|line| format!("{inner_pad}{line}")),
                );
            }
            other => lines.push(format!("{pad}{label}: {}", cell_text(other))),
        }
    }
}

fn table(items: &[Value]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key.as_str());
                }
            }
        }
    }
    // Columns with no value in any row are left out
    columns.retain(|column| {
        items
            .iter()
            .any(|item| item.get(*column).is_some_and(|v| !is_blank(v)))
    });

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(columns.iter().map(|c| label(c)));

    for item in items {
        table.add_row(
            columns
                .iter()
                .map(|c| item.get(*c).map(cell_text).unwrap_or_default()),
        );
    }

    table
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(k, v)| format!("{k}={}", cell_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Human label for a PascalCase field name
///
/// `LastModified` becomes `Last Modified`; acronyms stay together, so
/// `CORSRules` becomes `CORS Rules` and `ETag` stays `ETag`.
pub fn label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower && i >= 2) {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::types::{
        BucketAclOutput, BucketSummary, CorsConfiguration, Grant, Grantee, HeadBucketOutput,
        ListBucketsOutput, ObjectMetadata, Owner, VersioningConfiguration,
    };

    #[test]
    fn test_label() {
        assert_eq!(label("Bucket"), "Bucket");
        assert_eq!(label("LastModified"), "Last Modified");
        assert_eq!(label("CORSRules"), "CORS Rules");
        assert_eq!(label("MFADelete"), "MFA Delete");
        assert_eq!(label("ETag"), "ETag");
        assert_eq!(label("ID"), "ID");
        assert_eq!(label("VersionId"), "Version Id");
    }

    #[test]
    fn test_render_flat_record_skips_nulls() {
        let output = HeadBucketOutput {
            bucket: "photos".into(),
            region: None,
        };
        let lines = render_text(&output).unwrap();
        insta::assert_snapshot!(lines.join("\n"), @"Bucket: photos");
    }

    #[test]
    fn test_render_nested_record_is_indented() {
        let output = BucketAclOutput {
            owner: Some(Owner {
                id: Some("abc123".into()),
                display_name: Some("ops".into()),
            }),
            grants: vec![],
        };
        let lines = render_text(&output).unwrap();
        insta::assert_snapshot!(lines.join("\n"), @r"
        Owner:
          ID: abc123
          Display Name: ops
        ");
    }

    #[test]
    fn test_render_timestamps_and_numbers() {
        let output = ObjectMetadata {
            key: "cat.jpg".into(),
            content_length: Some(2048),
            content_type: Some("image/jpeg".into()),
            last_modified: Some("2024-05-01T12:00:00Z".parse().unwrap()),
            ..Default::default()
        };
        let lines = render_text(&output).unwrap();
        insta::assert_snapshot!(lines.join("\n"), @r"
        Key: cat.jpg
        Content Length: 2048
        Content Type: image/jpeg
        Last Modified: 2024-05-01T12:00:00Z
        ");
    }

    #[test]
    fn test_render_list_of_records_as_table() {
        let output = ListBucketsOutput {
            buckets: vec![
                BucketSummary {
                    name: "photos".into(),
                    creation_date: Some("2024-05-01T12:00:00Z".parse().unwrap()),
                },
                BucketSummary {
                    name: "logs".into(),
                    creation_date: None,
                },
            ],
            owner: None,
        };
        let lines = render_text(&output).unwrap();

        assert_eq!(lines[0], "Buckets:");
        let table = lines[1..].join("\n");
        assert!(table.contains("Name"));
        assert!(table.contains("Creation Date"));
        assert!(table.contains("photos"));
        assert!(table.contains("logs"));
        assert!(table.contains("2024-05-01T12:00:00Z"));
        assert!(lines[1..].iter().all(|l| l.starts_with("  ")));
    }

    #[test]
    fn test_table_cells_flatten_nested_records() {
        let output = BucketAclOutput {
            owner: None,
            grants: vec![Grant {
                grantee: Some(Grantee {
                    grantee_type: Some("CanonicalUser".into()),
                    id: Some("abc".into()),
                    ..Default::default()
                }),
                permission: Some("FULL_CONTROL".into()),
            }],
        };
        let text = render_text(&output).unwrap().join("\n");
        assert!(text.contains("Type=CanonicalUser, ID=abc"));
        assert!(text.contains("FULL_CONTROL"));
    }

    #[test]
    fn test_render_scalar_list_is_joined() {
        let value = serde_json::json!({"AllowedMethods": ["GET", "PUT"]});
        insta::assert_snapshot!(render_value(&value).join("\n"), @"Allowed Methods: GET, PUT");
    }

    #[test]
    fn test_is_empty() {
        let cors = serde_json::to_value(CorsConfiguration::default()).unwrap();
        assert!(is_empty(&cors));

        let versioning = serde_json::to_value(VersioningConfiguration::default()).unwrap();
        assert!(is_empty(&versioning));

        let versioning = serde_json::to_value(VersioningConfiguration {
            status: Some("Enabled".into()),
            mfa_delete: None,
        })
        .unwrap();
        assert!(!is_empty(&versioning));

        assert!(is_empty(&serde_json::json!({"IsTruncated": false, "Uploads": []})));
        assert!(!is_empty(&serde_json::json!({"IsTruncated": true})));
    }

    #[test]
    fn test_false_is_rendered_but_null_is_not() {
        let value = serde_json::json!({"IsTruncated": false, "NextContinuationToken": null});
        assert_eq!(render_value(&value), ["Is Truncated: false"]);
    }
}
