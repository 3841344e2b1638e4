//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStorage trait from cos-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types as sdk;

use cos_core::types::*;
use cos_core::{ConnectionSettings, Connector, Error, ObjectStorage, Result};

use crate::convert::{self, timestamp};
use crate::error::map_sdk_error;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    region: String,
}

impl S3Client {
    /// Create a new S3 client for one resolved region
    pub async fn new(settings: &ConnectionSettings) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.to_string()));

        if let Some(credentials) = &settings.credentials {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                None, // session token
                None, // expiry
                "cos-static-credentials",
            ));
        }

        if let Some(endpoint) = &settings.endpoint {
            url::Url::parse(endpoint)?;
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(settings.path_style)
            .build();

        tracing::debug!(
            region = %settings.region,
            endpoint = ?settings.endpoint,
            path_style = settings.path_style,
            "created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            region: settings.region.to_string(),
        })
    }
}

/// Opens [`S3Client`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Connector;

#[async_trait]
impl Connector for S3Connector {
    async fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn ObjectStorage>> {
        Ok(Box::new(S3Client::new(settings).await?))
    }
}

async fn file_body(path: &str) -> Result<(ByteStream, i64)> {
    let size = tokio::fs::metadata(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{path}: {e}")))
    })?;
    let body = ByteStream::from_path(Path::new(path))
        .await
        .map_err(|e| Error::General(format!("Failed to read {path}: {e}")))?;
    Ok((body, i64::try_from(size.len()).unwrap_or(i64::MAX)))
}

fn object_path(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

#[async_trait]
impl ObjectStorage for S3Client {
    async fn list_buckets(&self, _request: ListBucketsRequest) -> Result<ListBucketsOutput> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "list buckets"))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| BucketSummary {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: timestamp(b.creation_date()),
            })
            .collect();

        Ok(ListBucketsOutput {
            buckets,
            owner: response.owner().map(|o| Owner {
                id: o.id().map(str::to_string),
                display_name: o.display_name().map(str::to_string),
            }),
        })
    }

    async fn create_bucket(&self, request: CreateBucketRequest) -> Result<CreateBucketOutput> {
        let mut builder = self.inner.create_bucket().bucket(&request.bucket);

        if let Some(acl) = &request.acl {
            builder = builder.acl(sdk::BucketCannedAcl::from(acl.as_str()));
        }
        if let Some(config) = &request.create_bucket_configuration {
            builder = builder.create_bucket_configuration(
                sdk::CreateBucketConfiguration::builder()
                    .set_location_constraint(
                        config
                            .location_constraint
                            .as_deref()
                            .map(sdk::BucketLocationConstraint::from),
                    )
                    .build(),
            );
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(CreateBucketOutput {
            bucket: request.bucket,
            region: self.region.clone(),
            location: response.location().map(str::to_string),
        })
    }

    async fn delete_bucket(&self, request: BucketRequest) -> Result<BucketOutput> {
        self.inner
            .delete_bucket()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketOutput {
            bucket: request.bucket,
        })
    }

    async fn head_bucket(&self, request: BucketRequest) -> Result<HeadBucketOutput> {
        let response = self
            .inner
            .head_bucket()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(HeadBucketOutput {
            region: response.bucket_region().map(str::to_string),
            bucket: request.bucket,
        })
    }

    async fn get_bucket_location(&self, request: BucketRequest) -> Result<BucketLocationOutput> {
        let response = self
            .inner
            .get_bucket_location()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketLocationOutput {
            location_constraint: response
                .location_constraint()
                .map(|c| c.as_str().to_string())
                .filter(|c| !c.is_empty()),
            bucket: request.bucket,
        })
    }

    async fn get_bucket_acl(&self, request: BucketRequest) -> Result<BucketAclOutput> {
        let response = self
            .inner
            .get_bucket_acl()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        let grants = response
            .grants()
            .iter()
            .map(|g| Grant {
                grantee: g.grantee().map(|grantee| Grantee {
                    grantee_type: Some(grantee.r#type().as_str().to_string()),
                    id: grantee.id().map(str::to_string),
                    display_name: grantee.display_name().map(str::to_string),
                    uri: grantee.uri().map(str::to_string),
                    email_address: grantee.email_address().map(str::to_string),
                }),
                permission: g.permission().map(|p| p.as_str().to_string()),
            })
            .collect();

        Ok(BucketAclOutput {
            owner: response.owner().map(|o| Owner {
                id: o.id().map(str::to_string),
                display_name: o.display_name().map(str::to_string),
            }),
            grants,
        })
    }

    async fn put_bucket_acl(&self, request: PutBucketAclRequest) -> Result<BucketOutput> {
        self.inner
            .put_bucket_acl()
            .bucket(&request.bucket)
            .acl(sdk::BucketCannedAcl::from(request.acl.as_str()))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketOutput {
            bucket: request.bucket,
        })
    }

    async fn get_bucket_cors(&self, request: BucketRequest) -> Result<CorsConfiguration> {
        let result = self
            .inner
            .get_bucket_cors()
            .bucket(&request.bucket)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            // A bucket without CORS rules is not an error for this command
            Err(e) if aws_sdk_s3::error::ProvideErrorMetadata::code(&e)
                == Some("NoSuchCORSConfiguration") =>
            {
                return Ok(CorsConfiguration::default());
            }
            Err(e) => return Err(map_sdk_error(e, &format!("Bucket {}", request.bucket))),
        };

        Ok(CorsConfiguration {
            cors_rules: response.cors_rules().iter().map(convert::cors_rule).collect(),
        })
    }

    async fn put_bucket_cors(&self, request: PutBucketCorsRequest) -> Result<BucketOutput> {
        let configuration = convert::cors_configuration(request.cors_configuration)?;

        self.inner
            .put_bucket_cors()
            .bucket(&request.bucket)
            .cors_configuration(configuration)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketOutput {
            bucket: request.bucket,
        })
    }

    async fn delete_bucket_cors(&self, request: BucketRequest) -> Result<BucketOutput> {
        self.inner
            .delete_bucket_cors()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketOutput {
            bucket: request.bucket,
        })
    }

    async fn get_bucket_versioning(&self, request: BucketRequest) -> Result<VersioningConfiguration> {
        let response = self
            .inner
            .get_bucket_versioning()
            .bucket(&request.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(VersioningConfiguration {
            status: response.status().map(|s| s.as_str().to_string()),
            mfa_delete: response.mfa_delete().map(|m| m.as_str().to_string()),
        })
    }

    async fn put_bucket_versioning(&self, request: PutBucketVersioningRequest) -> Result<BucketOutput> {
        let config = request.versioning_configuration;
        let configuration = sdk::VersioningConfiguration::builder()
            .set_status(config.status.as_deref().map(sdk::BucketVersioningStatus::from))
            .set_mfa_delete(config.mfa_delete.as_deref().map(sdk::MfaDelete::from))
            .build();

        self.inner
            .put_bucket_versioning()
            .bucket(&request.bucket)
            .versioning_configuration(configuration)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        Ok(BucketOutput {
            bucket: request.bucket,
        })
    }

    async fn list_objects(&self, request: ListObjectsRequest) -> Result<ListObjectsOutput> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix)
            .set_delimiter(request.delimiter)
            .set_start_after(request.start_after)
            .set_max_keys(convert::opt_int32("MaxKeys", request.max_keys)?)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        let contents = response
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size(),
                last_modified: timestamp(object.last_modified()),
                e_tag: object.e_tag().map(str::to_string),
                storage_class: object.storage_class().map(|s| s.as_str().to_string()),
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        Ok(ListObjectsOutput {
            contents,
            common_prefixes,
            key_count: response.key_count().map(i64::from),
            is_truncated: response.is_truncated().unwrap_or(false),
            next_continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        let (body, size) = match &request.body {
            Some(path) => file_body(path).await?,
            None => (ByteStream::from_static(b""), 0),
        };

        let response = self
            .inner
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(body)
            .set_content_type(request.content_type.clone())
            .set_cache_control(request.cache_control)
            .set_storage_class(request.storage_class.as_deref().map(sdk::StorageClass::from))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &object_path(&request.bucket, &request.key)))?;

        Ok(PutObjectOutput {
            bucket: request.bucket,
            key: request.key,
            size,
            content_type: request.content_type,
            e_tag: response.e_tag().map(str::to_string),
            version_id: response.version_id().map(str::to_string),
        })
    }

    async fn get_object(&self, request: GetObjectRequest) -> Result<GetObjectOutput> {
        let response = self
            .inner
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_version_id(request.version_id)
            .set_range(request.range)
            .set_if_modified_since(request.if_modified_since.map(convert::datetime))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &object_path(&request.bucket, &request.key)))?;

        let content_length = response.content_length();
        let content_type = response.content_type().map(str::to_string);
        let e_tag = response.e_tag().map(str::to_string);
        let last_modified = timestamp(response.last_modified());
        let version_id = response.version_id().map(str::to_string);

        let mut reader = response.body.into_async_read();
        let mut file = tokio::fs::File::create(&request.out_file).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        tracing::debug!(path = %request.out_file, bytes = written, "wrote object");

        Ok(GetObjectOutput {
            bucket: request.bucket,
            key: request.key,
            out_file: request.out_file,
            content_length,
            content_type,
            e_tag,
            last_modified,
            version_id,
        })
    }

    async fn head_object(&self, request: ObjectRequest) -> Result<ObjectMetadata> {
        let response = self
            .inner
            .head_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_version_id(request.version_id)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &object_path(&request.bucket, &request.key)))?;

        Ok(ObjectMetadata {
            key: request.key,
            content_length: response.content_length(),
            content_type: response.content_type().map(str::to_string),
            cache_control: response.cache_control().map(str::to_string),
            e_tag: response.e_tag().map(str::to_string),
            last_modified: timestamp(response.last_modified()),
            storage_class: response.storage_class().map(|s| s.as_str().to_string()),
            version_id: response.version_id().map(str::to_string),
        })
    }

    async fn delete_object(&self, request: ObjectRequest) -> Result<DeleteObjectOutput> {
        let response = self
            .inner
            .delete_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_version_id(request.version_id)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &object_path(&request.bucket, &request.key)))?;

        Ok(DeleteObjectOutput {
            bucket: request.bucket,
            key: request.key,
            version_id: response.version_id().map(str::to_string),
            delete_marker: response.delete_marker(),
        })
    }

    async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectOutput> {
        let response = self
            .inner
            .copy_object()
            .copy_source(&request.copy_source)
            .bucket(&request.bucket)
            .key(&request.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &request.copy_source))?;

        let result = response.copy_object_result();
        Ok(CopyObjectOutput {
            bucket: request.bucket,
            key: request.key,
            e_tag: result.and_then(|r| r.e_tag()).map(str::to_string),
            last_modified: timestamp(result.and_then(|r| r.last_modified())),
            version_id: response.version_id().map(str::to_string),
        })
    }

    async fn delete_objects(&self, request: DeleteObjectsRequest) -> Result<DeleteObjectsOutput> {
        let delete = convert::delete(request.delete)?;

        let response = self
            .inner
            .delete_objects()
            .bucket(&request.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        let deleted = response
            .deleted()
            .iter()
            .map(|d| DeletedObject {
                key: d.key().unwrap_or_default().to_string(),
                version_id: d.version_id().map(str::to_string),
                delete_marker: d.delete_marker(),
            })
            .collect();

        let errors: Vec<DeleteFailure> = response
            .errors()
            .iter()
            .map(|e| DeleteFailure {
                key: e.key().unwrap_or_default().to_string(),
                code: e.code().map(str::to_string),
                message: e.message().map(str::to_string),
            })
            .collect();

        if !errors.is_empty() {
            tracing::warn!(failed = errors.len(), "some objects were not deleted");
        }

        Ok(DeleteObjectsOutput { deleted, errors })
    }

    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadOutput> {
        let response = self
            .inner
            .create_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_content_type(request.content_type)
            .set_storage_class(request.storage_class.as_deref().map(sdk::StorageClass::from))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &object_path(&request.bucket, &request.key)))?;

        let upload_id = response
            .upload_id()
            .ok_or_else(|| Error::General("Server returned no upload ID".into()))?
            .to_string();

        Ok(CreateMultipartUploadOutput {
            bucket: request.bucket,
            key: request.key,
            upload_id,
        })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadOutput> {
        let upload = convert::completed_upload(request.multipart_upload)?;

        let response = self
            .inner
            .complete_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .multipart_upload(upload)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Upload {}", request.upload_id)))?;

        Ok(CompleteMultipartUploadOutput {
            bucket: request.bucket,
            key: request.key,
            location: response.location().map(str::to_string),
            e_tag: response.e_tag().map(str::to_string),
            version_id: response.version_id().map(str::to_string),
        })
    }

    async fn abort_multipart_upload(&self, request: UploadRequest) -> Result<AbortMultipartUploadOutput> {
        self.inner
            .abort_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Upload {}", request.upload_id)))?;

        Ok(AbortMultipartUploadOutput {
            bucket: request.bucket,
            key: request.key,
            upload_id: request.upload_id,
        })
    }

    async fn list_multipart_uploads(
        &self,
        request: ListMultipartUploadsRequest,
    ) -> Result<ListMultipartUploadsOutput> {
        let response = self
            .inner
            .list_multipart_uploads()
            .bucket(&request.bucket)
            .set_prefix(request.prefix)
            .set_max_uploads(convert::opt_int32("MaxUploads", request.max_uploads)?)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Bucket {}", request.bucket)))?;

        let uploads = response
            .uploads()
            .iter()
            .map(|u| MultipartUploadSummary {
                key: u.key().unwrap_or_default().to_string(),
                upload_id: u.upload_id().unwrap_or_default().to_string(),
                initiated: timestamp(u.initiated()),
                storage_class: u.storage_class().map(|s| s.as_str().to_string()),
            })
            .collect();

        Ok(ListMultipartUploadsOutput {
            uploads,
            is_truncated: response.is_truncated().unwrap_or(false),
        })
    }

    async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartOutput> {
        let (body, size) = file_body(&request.body).await?;

        let response = self
            .inner
            .upload_part()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .part_number(convert::int32("PartNumber", request.part_number)?)
            .body(body)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Upload {}", request.upload_id)))?;

        Ok(UploadPartOutput {
            part_number: request.part_number,
            size,
            e_tag: response.e_tag().map(str::to_string),
        })
    }

    async fn list_parts(&self, request: ListPartsRequest) -> Result<ListPartsOutput> {
        let response = self
            .inner
            .list_parts()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .set_max_parts(convert::opt_int32("MaxParts", request.max_parts)?)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("Upload {}", request.upload_id)))?;

        let parts = response
            .parts()
            .iter()
            .map(|p| PartSummary {
                part_number: p.part_number().map(i64::from).unwrap_or_default(),
                size: p.size(),
                e_tag: p.e_tag().map(str::to_string),
                last_modified: timestamp(p.last_modified()),
            })
            .collect();

        Ok(ListPartsOutput {
            parts,
            is_truncated: response.is_truncated().unwrap_or(false),
        })
    }
}
