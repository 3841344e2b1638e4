//! ObjectStorage trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It allows the CLI to be decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;

use crate::config::{ConfigSource, Credentials, keys};
use crate::error::{Error, Result};
use crate::region::ResolvedRegion;
use crate::types::*;

/// Trait for S3-compatible storage operations
///
/// One method per command. Implemented by the S3 adapter and by test doubles.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    // Buckets
    async fn list_buckets(&self, request: ListBucketsRequest) -> Result<ListBucketsOutput>;
    async fn create_bucket(&self, request: CreateBucketRequest) -> Result<CreateBucketOutput>;
    async fn delete_bucket(&self, request: BucketRequest) -> Result<BucketOutput>;
    async fn head_bucket(&self, request: BucketRequest) -> Result<HeadBucketOutput>;
    async fn get_bucket_location(&self, request: BucketRequest) -> Result<BucketLocationOutput>;
    async fn get_bucket_acl(&self, request: BucketRequest) -> Result<BucketAclOutput>;
    async fn put_bucket_acl(&self, request: PutBucketAclRequest) -> Result<BucketOutput>;
    async fn get_bucket_cors(&self, request: BucketRequest) -> Result<CorsConfiguration>;
    async fn put_bucket_cors(&self, request: PutBucketCorsRequest) -> Result<BucketOutput>;
    async fn delete_bucket_cors(&self, request: BucketRequest) -> Result<BucketOutput>;
    async fn get_bucket_versioning(&self, request: BucketRequest) -> Result<VersioningConfiguration>;
    async fn put_bucket_versioning(&self, request: PutBucketVersioningRequest) -> Result<BucketOutput>;

    // Objects
    async fn list_objects(&self, request: ListObjectsRequest) -> Result<ListObjectsOutput>;
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput>;
    async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput>;
    async fn head_object(&self, request: ObjectRequest) -> Result<ObjectMetadata>;
    async fn delete_object(&self, request: ObjectRequest) -> Result<DeleteObjectOutput>;
    async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectOutput>;
    async fn delete_objects(&self, request: DeleteObjectsRequest) -> Result<DeleteObjectsOutput>;

    // Multipart uploads
    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadOutput>;
    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadOutput>;
    async fn abort_multipart_upload(&self, request: UploadRequest) -> Result<AbortMultipartUploadOutput>;
    async fn list_multipart_uploads(
        &self,
        request: ListMultipartUploadsRequest,
    ) -> Result<ListMultipartUploadsOutput>;
    async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartOutput>;
    async fn list_parts(&self, request: ListPartsRequest) -> Result<ListPartsOutput>;
}

/// Everything needed to open a client for one command
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub region: ResolvedRegion,
    pub endpoint: Option<String>,
    pub path_style: bool,
    /// Static credentials; `None` defers to the SDK's default provider chain
    pub credentials: Option<Credentials>,
}

impl ConnectionSettings {
    /// Collect connection settings for an already resolved region
    pub fn from_config(region: ResolvedRegion, config: &impl ConfigSource) -> Result<Self> {
        let endpoint = config.get_string(keys::SERVICE_ENDPOINT)?;
        let path_style = config.get_bool_with_default(keys::PATH_STYLE, true)?;

        let credentials = match (
            config.get_string(keys::ACCESS_KEY)?,
            config.get_string(keys::SECRET_KEY)?,
        ) {
            (Some(access_key), Some(secret_key)) => Some(Credentials {
                access_key,
                secret_key,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "access_key and secret_key must be set together".into(),
                ));
            }
        };

        Ok(Self {
            region,
            endpoint,
            path_style,
            credentials,
        })
    }
}

/// Opens a storage client
///
/// The CLI calls this only after the request is bound and the region is
/// resolved, so a usage error never touches the network.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn ObjectStorage>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MockConfigSource};
    use crate::region::resolve_region;

    #[test]
    fn test_settings_from_defaults() {
        let config = Config::default();
        let region = resolve_region(Some("us-east"), &config).unwrap();

        let settings = ConnectionSettings::from_config(region, &config).unwrap();
        assert_eq!(settings.region.as_str(), "us-east");
        assert_eq!(settings.endpoint, None);
        assert!(settings.path_style);
        assert_eq!(settings.credentials, None);
    }

    #[test]
    fn test_settings_from_configured_values() {
        let mut config = Config::default();
        config
            .set(keys::SERVICE_ENDPOINT, "https://s3.eu-de.example.com")
            .unwrap();
        config.set(keys::PATH_STYLE, "false").unwrap();
        config.set(keys::ACCESS_KEY, "AK").unwrap();
        config.set(keys::SECRET_KEY, "SK").unwrap();
        let region = resolve_region(Some("eu-de"), &config).unwrap();

        let settings = ConnectionSettings::from_config(region, &config).unwrap();
        assert_eq!(
            settings.endpoint.as_deref(),
            Some("https://s3.eu-de.example.com")
        );
        assert!(!settings.path_style);
        assert_eq!(
            settings.credentials,
            Some(Credentials {
                access_key: "AK".into(),
                secret_key: "SK".into(),
            })
        );
    }

    #[test]
    fn test_half_configured_credentials_rejected() {
        let mut config = Config::default();
        config.set(keys::ACCESS_KEY, "AK").unwrap();
        let region = resolve_region(Some("eu-de"), &config).unwrap();

        let err = ConnectionSettings::from_config(region, &config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_settings_read_through_config_source() {
        let mut source = MockConfigSource::new();
        source
            .expect_get_string()
            .returning(|key| match key {
                "service_endpoint" => Ok(Some("http://localhost:9000".into())),
                _ => Ok(None),
            });
        source
            .expect_get_bool_with_default()
            .returning(|_, default| Ok(default));

        let region = resolve_region(Some("local"), &source).unwrap();
        let settings = ConnectionSettings::from_config(region, &source).unwrap();
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(settings.path_style);
    }
}
