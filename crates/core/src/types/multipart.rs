//! Multipart upload requests and responses

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::object::STORAGE_CLASSES;
use crate::binding::field::{self, Bindable, Field};
use crate::error::BindingError;

/// Part numbers accepted by S3-compatible services
pub const PART_NUMBER_RANGE: std::ops::RangeInclusive<i64> = 1..=10_000;

fn part_number(value: &crate::binding::ParsedValue) -> Result<i64, BindingError> {
    let number = field::int64(value)?;
    if PART_NUMBER_RANGE.contains(&number) {
        Ok(number)
    } else {
        Err(BindingError::invalid(format!(
            "part number {number} is outside {}..={}",
            PART_NUMBER_RANGE.start(),
            PART_NUMBER_RANGE.end()
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateMultipartUploadRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub storage_class: Option<String>,
}

impl Bindable for CreateMultipartUploadRequest {
    const NAME: &'static str = "CreateMultipartUploadRequest";

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
            Field::scalar("ContentType", |r: &mut Self, v| {
                r.content_type = Some(field::string(v)?);
                Ok(())
            }),
            Field::scalar("StorageClass", |r: &mut Self, v| {
                r.storage_class = Some(field::one_of(v, STORAGE_CLASSES)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompletedPart {
    pub e_tag: String,
    pub part_number: i64,
}

impl Bindable for CompletedPart {
    const NAME: &'static str = "CompletedPart";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("ETag", |r: &mut Self, v| {
                r.e_tag = field::string(v)?;
                Ok(())
            }),
            Field::scalar("PartNumber", |r: &mut Self, v| {
                r.part_number = part_number(v)?;
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompletedMultipartUpload {
    pub parts: Vec<CompletedPart>,
}

impl Bindable for CompletedMultipartUpload {
    const NAME: &'static str = "CompletedMultipartUpload";

    fn fields() -> Vec<Field<Self>> {
        vec![Field::structure("Parts", |r: &mut Self, v| {
            let parts: Vec<CompletedPart> = field::list_of(v)?;
            for (index, part) in parts.iter().enumerate() {
                if part.e_tag.is_empty() || part.part_number == 0 {
                    return Err(BindingError::invalid(
                        "each part needs both ETag and PartNumber",
                    )
                    .within(&format!("[{index}]")));
                }
            }
            r.parts = parts;
            Ok(())
        })]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompleteMultipartUploadRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub multipart_upload: CompletedMultipartUpload,
}

impl Bindable for CompleteMultipartUploadRequest {
    const NAME: &'static str = "CompleteMultipartUploadRequest";

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
            Field::scalar("UploadId", |r: &mut Self, v| {
                r.upload_id = field::string(v)?;
                Ok(())
            }),
            Field::structure("MultipartUpload", |r: &mut Self, v| {
                r.multipart_upload = field::bind_record(v)?;
                Ok(())
            }),
        ]
    }
}

/// Bucket, key and upload id of an in-progress upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

impl Bindable for UploadRequest {
    const NAME: &'static str = "UploadRequest";

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
            Field::scalar("UploadId", |r: &mut Self, v| {
                r.upload_id = field::string(v)?;
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMultipartUploadsRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub max_uploads: Option<i64>,
}

impl Bindable for ListMultipartUploadsRequest {
    const NAME: &'static str = "ListMultipartUploadsRequest";

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
            Field::scalar("MaxUploads", |r: &mut Self, v| {
                r.max_uploads = Some(field::int64(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadPartRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub part_number: i64,
    /// Local file holding the part data
    pub body: String,
}

impl Bindable for UploadPartRequest {
    const NAME: &'static str = "UploadPartRequest";

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
            Field::scalar("UploadId", |r: &mut Self, v| {
                r.upload_id = field::string(v)?;
                Ok(())
            }),
            Field::scalar("PartNumber", |r: &mut Self, v| {
                r.part_number = part_number(v)?;
                Ok(())
            }),
            Field::scalar("Body", |r: &mut Self, v| {
                r.body = field::string(v)?;
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPartsRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub max_parts: Option<i64>,
}

impl Bindable for ListPartsRequest {
    const NAME: &'static str = "ListPartsRequest";

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
            Field::scalar("UploadId", |r: &mut Self, v| {
                r.upload_id = field::string(v)?;
                Ok(())
            }),
            Field::scalar("MaxParts", |r: &mut Self, v| {
                r.max_parts = Some(field::int64(v)?);
                Ok(())
            }),
        ]
    }
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompleteMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub location: Option<String>,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbortMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultipartUploadSummary {
    pub key: String,
    pub upload_id: String,
    pub initiated: Option<Timestamp>,
    pub storage_class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListMultipartUploadsOutput {
    pub uploads: Vec<MultipartUploadSummary>,
    pub is_truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadPartOutput {
    pub part_number: i64,
    pub size: i64,
    pub e_tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartSummary {
    pub part_number: i64,
    pub size: Option<i64>,
    pub e_tag: Option<String>,
    pub last_modified: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPartsOutput {
    pub parts: Vec<PartSummary>,
    pub is_truncated: bool,
}
