//! Object requests and responses

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::binding::field::{self, Bindable, Field};

/// Storage classes accepted on upload
pub const STORAGE_CLASSES: &[&str] = &[
    "STANDARD",
    "REDUCED_REDUNDANCY",
    "STANDARD_IA",
    "ONEZONE_IA",
    "INTELLIGENT_TIERING",
    "GLACIER",
    "DEEP_ARCHIVE",
    "GLACIER_IR",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListObjectsRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub start_after: Option<String>,
    pub max_keys: Option<i64>,
}

impl Bindable for ListObjectsRequest {
    const NAME: &'static str = "ListObjectsRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Prefix", |r: &mut Self, v| {
                r.prefix = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("Delimiter", |r: &mut Self, v| {
                r.delimiter = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("StartAfter", |r: &mut Self, v| {
                r.start_after = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("MaxKeys", |r: &mut Self, v| {
                r.max_keys = Some(field::int64(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    /// Local file to upload; an empty object is created without one
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub storage_class: Option<String>,
}

impl Bindable for PutObjectRequest {
    const NAME: &'static str = "PutObjectRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Key", |r: &mut Self, v| {
                r.key = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Body", |r: &mut Self, v| {
                r.body = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("ContentType", |r: &mut Self, v| {
                r.content_type = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("CacheControl", |r: &mut Self, v| {
                r.cache_control = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("StorageClass", |r: &mut Self, v| {
                r.storage_class = Some(field::one_of(v, STORAGE_CLASSES)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetObjectRequest {
    pub bucket: String,
    pub key: String,
    /// Local file the object is written to
    pub out_file: String,
    pub version_id: Option<String>,
    pub range: Option<String>,
    pub if_modified_since: Option<Timestamp>,
}

impl Bindable for GetObjectRequest {
    const NAME: &'static str = "GetObjectRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Key", |r: &mut Self, v| {
                r.key = field::string(v)?;
                Ok(())
            }),
            Field::scalar("OutFile", |r: &mut Self, v| {
                r.out_file = field::string(v)?;
                Ok(())
            }),
            Field::scalar("VersionId", |r: &mut Self, v| {
                r.version_id = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("Range", |r: &mut Self, v| {
                r.range = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("IfModifiedSince", |r: &mut Self, v| {
                r.if_modified_since = Some(field::timestamp(v)?);
                Ok(())
            }),
        ]
    }
}

/// Bucket, key and optional version of one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectRequest {
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
}

impl Bindable for ObjectRequest {
    const NAME: &'static str = "ObjectRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Key", |r: &mut Self, v| {
                r.key = field::string(v)?;
                Ok(())
            }),
            Field::scalar("VersionId", |r: &mut Self, v| {
                r.version_id = Some(field::string(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyObjectRequest {
    pub bucket: String,
    pub key: String,
    /// `source-bucket/source-key`
    pub copy_source: String,
}

impl Bindable for CopyObjectRequest {
    const NAME: &'static str = "CopyObjectRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("Key", |r: &mut Self, v| {
                r.key = field::string(v)?;
                Ok(())
            }),
            Field::scalar("CopySource", |r: &mut Self, v| {
                let source = field::string(v)?;
                match source.trim_start_matches('/').split_once('/') {
                    Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {}
                    _ => {
                        return Err(crate::error::BindingError::invalid(format!(
                            "expected 'bucket/key', got '{source}'"
                        )));
                    }
                }
                r.copy_source = source;
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectIdentifier {
    pub key: String,
    pub version_id: Option<String>,
}

impl Bindable for ObjectIdentifier {
    const NAME: &'static str = "ObjectIdentifier";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Key", |r: &mut Self, v| {
                r.key = field::string(v)?;
                Ok(())
            }),
            Field::scalar("VersionId", |r: &mut Self, v| {
                r.version_id = Some(field::string(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Delete {
    pub objects: Vec<ObjectIdentifier>,
    pub quiet: Option<bool>,
}

impl Bindable for Delete {
    const NAME: &'static str = "Delete";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::structure("Objects", |r: &mut Self, v| {
                r.objects = field::list_of(v)?;
                Ok(())
            }),
            Field::scalar("Quiet", |r: &mut Self, v| {
                r.quiet = Some(field::boolean(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteObjectsRequest {
    pub bucket: String,
    pub delete: Delete,
}

impl Bindable for DeleteObjectsRequest {
    const NAME: &'static str = "DeleteObjectsRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::structure("Delete", |r: &mut Self, v| {
                r.delete = field::bind_record(v)?;
                Ok(())
            }),
        ]
    }
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSummary {
    pub key: String,
    pub size: Option<i64>,
    pub last_modified: Option<Timestamp>,
    pub e_tag: Option<String>,
    pub storage_class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListObjectsOutput {
    pub contents: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
    pub key_count: Option<i64>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutObjectOutput {
    pub bucket: String,
    pub key: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetObjectOutput {
    pub bucket: String,
    pub key: String,
    pub out_file: String,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectMetadata {
    pub key: String,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub e_tag: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub storage_class: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteObjectOutput {
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
    pub delete_marker: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyObjectOutput {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletedObject {
    pub key: String,
    pub version_id: Option<String>,
    pub delete_marker: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteFailure {
    pub key: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteObjectsOutput {
    pub deleted: Vec<DeletedObject>,
    pub errors: Vec<DeleteFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{FieldSpecs, Invocation, bind_request};
    use crate::error::BindingError;

    fn delete_specs() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", "")
            .mandatory("Delete", "delete", "")
    }

    #[test]
    fn test_bind_delete_shorthand() {
        let invocation = Invocation::new()
            .with_flag("bucket", "photos")
            .with_flag("delete", "Objects=[{Key=a.txt},{Key=b.txt,VersionId=v2}],Quiet=false");

        let request: DeleteObjectsRequest = bind_request(&delete_specs(), &invocation).unwrap();
        assert_eq!(request.bucket, "photos");
        assert_eq!(
            request.delete.objects,
            vec![
                ObjectIdentifier {
                    key: "a.txt".into(),
                    version_id: None,
                },
                ObjectIdentifier {
                    key: "b.txt".into(),
                    version_id: Some("v2".into()),
                },
            ]
        );
        assert_eq!(request.delete.quiet, Some(false));
    }

    #[test]
    fn test_bind_delete_json() {
        let invocation = Invocation::new().with_flag("bucket", "photos").with_flag(
            "delete",
            r#"{"Objects": [{"Key": "a.txt"}], "Quiet": true}"#,
        );

        let request: DeleteObjectsRequest = bind_request(&delete_specs(), &invocation).unwrap();
        assert_eq!(request.delete.objects.len(), 1);
        assert_eq!(request.delete.objects[0].key, "a.txt");
        assert_eq!(request.delete.quiet, Some(true));
    }

    #[test]
    fn test_delete_errors_carry_path() {
        let invocation = Invocation::new()
            .with_flag("bucket", "photos")
            .with_flag("delete", "Objects=[{Key=a},{Kye=b}]");
        let err = bind_request::<DeleteObjectsRequest>(&delete_specs(), &invocation).unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownField {
                field: "Delete.Objects[1].Kye".into(),
                target: "ObjectIdentifier".into(),
            }
        );

        let invocation = Invocation::new()
            .with_flag("bucket", "photos")
            .with_flag("delete", "Objects=[{Key=a}],Quiet=fale");
        let err = bind_request::<DeleteObjectsRequest>(&delete_specs(), &invocation).unwrap_err();
        assert!(matches!(err, BindingError::TypeCoercionFailure { .. }));
        assert_eq!(err.field(), Some("Delete.Quiet"));
    }

    #[test]
    fn test_bind_list_objects_optional_fields() {
        let specs = FieldSpecs::new()
            .mandatory("Bucket", "bucket", "")
            .optional("Prefix", "prefix", "")
            .optional("MaxKeys", "max-keys", "");

        let invocation = Invocation::new()
            .with_flag("bucket", "logs")
            .with_flag("max-keys", "50");
        let request: ListObjectsRequest = bind_request(&specs, &invocation).unwrap();
        assert_eq!(request.bucket, "logs");
        assert_eq!(request.prefix, None);
        assert_eq!(request.max_keys, Some(50));

        let invocation = Invocation::new()
            .with_flag("bucket", "logs")
            .with_flag("max-keys", "1a");
        let err = bind_request::<ListObjectsRequest>(&specs, &invocation).unwrap_err();
        assert_eq!(err.field(), Some("MaxKeys"));
    }

    #[test]
    fn test_bind_get_object_timestamp() {
        let specs = FieldSpecs::new()
            .mandatory("Bucket", "bucket", "")
            .mandatory("Key", "key", "")
            .mandatory("OutFile", "out-file", "")
            .optional("IfModifiedSince", "if-modified-since", "");

        let invocation = Invocation::new()
            .with_flag("bucket", "b")
            .with_flag("key", "k")
            .with_flag("out-file", "/tmp/k")
            .with_flag("if-modified-since", "2024-05-01T12:00:00Z");
        let request: GetObjectRequest = bind_request(&specs, &invocation).unwrap();
        assert_eq!(
            request.if_modified_since.map(|t| t.as_second()),
            Some(1_714_564_800)
        );

        let invocation = Invocation::new()
            .with_flag("bucket", "b")
            .with_flag("key", "k")
            .with_flag("out-file", "/tmp/k")
            .with_flag("if-modified-since", "yesterday");
        assert!(bind_request::<GetObjectRequest>(&specs, &invocation).is_err());
    }

    #[test]
    fn test_copy_source_must_name_bucket_and_key() {
        let specs = FieldSpecs::new()
            .mandatory("Bucket", "bucket", "")
            .mandatory("Key", "key", "")
            .mandatory("CopySource", "copy-source", "");

        let invocation = Invocation::new()
            .with_flag("bucket", "dst")
            .with_flag("key", "copy.txt")
            .with_flag("copy-source", "src/dir/orig.txt");
        let request: CopyObjectRequest = bind_request(&specs, &invocation).unwrap();
        assert_eq!(request.copy_source, "src/dir/orig.txt");

        for bad in ["src", "src/", "/orig.txt"] {
            let invocation = Invocation::new()
                .with_flag("bucket", "dst")
                .with_flag("key", "copy.txt")
                .with_flag("copy-source", bad);
            let err = bind_request::<CopyObjectRequest>(&specs, &invocation).unwrap_err();
            assert_eq!(err.field(), Some("CopySource"), "{bad}");
        }
    }

    #[test]
    fn test_storage_class_is_validated() {
        let specs = FieldSpecs::new()
            .mandatory("Bucket", "bucket", "")
            .mandatory("Key", "key", "")
            .optional("StorageClass", "storage-class", "");
        let invocation = Invocation::new()
            .with_flag("bucket", "b")
            .with_flag("key", "k")
            .with_flag("storage-class", "standard");
        assert!(bind_request::<PutObjectRequest>(&specs, &invocation).is_err());
    }

    #[test]
    fn test_list_objects_output_json_field_names() {
        let output = ListObjectsOutput {
            contents: vec![ObjectSummary {
                key: "a.txt".into(),
                size: Some(3),
                e_tag: Some("\"abc\"".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["Contents"][0]["Key"], "a.txt");
        assert_eq!(value["Contents"][0]["ETag"], "\"abc\"");
        assert!(value["Contents"][0]["LastModified"].is_null());
        assert_eq!(value["IsTruncated"], false);
        assert_eq!(value["CommonPrefixes"], serde_json::json!([]));
    }
}
