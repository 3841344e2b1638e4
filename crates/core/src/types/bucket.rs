//! Bucket requests and responses
//!
//! Field names in the binding tables match the serde names of the response
//! types, so a structure printed with `--output json` can be fed back as a
//! flag value.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::binding::field::{self, Bindable, Field};

/// Canned ACLs accepted for buckets
pub const BUCKET_CANNED_ACLS: &[&str] = &[
    "private",
    "public-read",
    "public-read-write",
    "authenticated-read",
];

/// Request with no fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBucketsRequest;

impl Bindable for ListBucketsRequest {
    const NAME: &'static str = "ListBucketsRequest";

    fn fields() -> Vec<Field<Self>> {
        Vec::new()
    }
}

/// Request that only names a bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketRequest {
    pub bucket: String,
}

impl Bindable for BucketRequest {
    const NAME: &'static str = "BucketRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![Field::scalar("Bucket", |r: &mut Self, v| {
            r.bucket = field::string(v)?;
            Ok(())
        })]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBucketConfiguration {
    pub location_constraint: Option<String>,
}

impl Bindable for CreateBucketConfiguration {
    const NAME: &'static str = "CreateBucketConfiguration";

    fn fields() -> Vec<Field<Self>> {
        vec![Field::scalar("LocationConstraint", |r: &mut Self, v| {
            r.location_constraint = Some(field::string(v)?);
            Ok(())
        })]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBucketRequest {
    pub bucket: String,
    pub acl: Option<String>,
    pub create_bucket_configuration: Option<CreateBucketConfiguration>,
}

impl Bindable for CreateBucketRequest {
    const NAME: &'static str = "CreateBucketRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("ACL", |r: &mut Self, v| {
                r.acl = Some(field::one_of(v, BUCKET_CANNED_ACLS)?);
                Ok(())
            }),
            Field::structure("CreateBucketConfiguration", |r: &mut Self, v| {
                r.create_bucket_configuration = Some(field::bind_record(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutBucketAclRequest {
    pub bucket: String,
    pub acl: String,
}

impl Bindable for PutBucketAclRequest {
    const NAME: &'static str = "PutBucketAclRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::scalar("ACL", |r: &mut Self, v| {
                r.acl = field::one_of(v, BUCKET_CANNED_ACLS)?;
                Ok(())
            }),
        ]
    }
}

/// One CORS rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorsRule {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub expose_headers: Vec<String>,
    pub max_age_seconds: Option<i64>,
}

/// HTTP methods a CORS rule may allow
pub const CORS_METHODS: &[&str] = &["GET", "PUT", "POST", "DELETE", "HEAD"];

impl Bindable for CorsRule {
    const NAME: &'static str = "CORSRule";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("ID", |r: &mut Self, v| {
                r.id = Some(field::string(v)?);
                Ok(())
            }),
            Field::structure("AllowedHeaders", |r: &mut Self, v| {
                r.allowed_headers = field::string_list(v)?;
                Ok(())
            }),
            Field::structure("AllowedMethods", |r: &mut Self, v| {
                let methods = field::string_list(v)?;
                for (index, method) in methods.iter().enumerate() {
                    crate::binding::coerce::one_of(method, CORS_METHODS)
                        .map_err(|e| e.within(&format!("[{index}]")))?;
                }
                r.allowed_methods = methods;
                Ok(())
            }),
            Field::structure("AllowedOrigins", |r: &mut Self, v| {
                r.allowed_origins = field::string_list(v)?;
                Ok(())
            }),
            Field::structure("ExposeHeaders", |r: &mut Self, v| {
                r.expose_headers = field::string_list(v)?;
                Ok(())
            }),
            Field::scalar("MaxAgeSeconds", |r: &mut Self, v| {
                r.max_age_seconds = Some(field::int64(v)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorsConfiguration {
    #[serde(rename = "CORSRules")]
    pub cors_rules: Vec<CorsRule>,
}

impl Bindable for CorsConfiguration {
    const NAME: &'static str = "CORSConfiguration";

    fn fields() -> Vec<Field<Self>> {
        vec![Field::structure("CORSRules", |r: &mut Self, v| {
            r.cors_rules = field::list_of(v)?;
            Ok(())
        })]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutBucketCorsRequest {
    pub bucket: String,
    pub cors_configuration: CorsConfiguration,
}

impl Bindable for PutBucketCorsRequest {
    const NAME: &'static str = "PutBucketCorsRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::structure("CORSConfiguration", |r: &mut Self, v| {
                r.cors_configuration = field::bind_record(v)?;
                Ok(())
            }),
        ]
    }
}

pub const VERSIONING_STATUSES: &[&str] = &["Enabled", "Suspended"];
pub const MFA_DELETE_STATUSES: &[&str] = &["Enabled", "Disabled"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersioningConfiguration {
    pub status: Option<String>,
    #[serde(rename = "MFADelete")]
    pub mfa_delete: Option<String>,
}

impl Bindable for VersioningConfiguration {
    const NAME: &'static str = "VersioningConfiguration";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Status", |r: &mut Self, v| {
                r.status = Some(field::one_of(v, VERSIONING_STATUSES)?);
                Ok(())
            }),
            Field::scalar("MFADelete", |r: &mut Self, v| {
                r.mfa_delete = Some(field::one_of(v, MFA_DELETE_STATUSES)?);
                Ok(())
            }),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutBucketVersioningRequest {
    pub bucket: String,
    pub versioning_configuration: VersioningConfiguration,
}

impl Bindable for PutBucketVersioningRequest {
    const NAME: &'static str = "PutBucketVersioningRequest";

    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::scalar("Bucket", |r: &mut Self, v| {
                r.bucket = field::string(v)?;
                Ok(())
            }),
            Field::structure("VersioningConfiguration", |r: &mut Self, v| {
                r.versioning_configuration = field::bind_record(v)?;
                Ok(())
            }),
        ]
    }
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Owner {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListBucketsOutput {
    pub buckets: Vec<BucketSummary>,
    pub owner: Option<Owner>,
}

/// Response of commands that only report which bucket they acted on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketOutput {
    pub bucket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBucketOutput {
    pub bucket: String,
    pub region: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeadBucketOutput {
    pub bucket: String,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketLocationOutput {
    pub bucket: String,
    pub location_constraint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grantee {
    #[serde(rename = "Type")]
    pub grantee_type: Option<String>,
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grant {
    pub grantee: Option<Grantee>,
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketAclOutput {
    pub owner: Option<Owner>,
    pub grants: Vec<Grant>,
}
