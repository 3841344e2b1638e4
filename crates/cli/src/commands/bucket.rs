//! Bucket operations
//!
//! Listing, creation, deletion, existence checks, location and ACLs.

use async_trait::async_trait;

use cos_core::binding::FieldSpecs;
use cos_core::types::{
    BucketAclOutput, BucketLocationOutput, BucketOutput, BucketRequest, CreateBucketOutput,
    CreateBucketRequest, HeadBucketOutput, ListBucketsOutput, ListBucketsRequest,
    PutBucketAclRequest,
};
use cos_core::{ObjectStorage, Result};

use super::operation::Operation;

pub(crate) const BUCKET_HELP: &str = "Name of the bucket";

fn bucket_only() -> FieldSpecs {
    FieldSpecs::new().mandatory("Bucket", "bucket", BUCKET_HELP)
}

/// List all buckets in the account
pub struct ListBuckets;

#[async_trait]
impl Operation for ListBuckets {
    const NAME: &'static str = "buckets";
    const ABOUT: &'static str = "List all buckets";
    const EMPTY_MESSAGE: Option<&'static str> = Some("No buckets found.");

    type Request = ListBucketsRequest;
    type Response = ListBucketsOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.list_buckets(request).await
    }
}

pub struct CreateBucket;

#[async_trait]
impl Operation for CreateBucket {
    const NAME: &'static str = "bucket-create";
    const ABOUT: &'static str = "Create a bucket";

    type Request = CreateBucketRequest;
    type Response = CreateBucketOutput;

    fn fields() -> FieldSpecs {
        bucket_only()
            .optional("ACL", "acl", "Canned ACL to apply, e.g. private or public-read")
            .optional(
                "CreateBucketConfiguration",
                "create-bucket-configuration",
                "Bucket configuration, e.g. LocationConstraint=us-standard",
            )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.create_bucket(request).await
    }
}

/// Delete an empty bucket
pub struct DeleteBucket;

#[async_trait]
impl Operation for DeleteBucket {
    const NAME: &'static str = "bucket-delete";
    const ABOUT: &'static str = "Delete an empty bucket";

    type Request = BucketRequest;
    type Response = BucketOutput;

    fn fields() -> FieldSpecs {
        bucket_only()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.delete_bucket(request).await
    }
}

pub struct HeadBucket;

#[async_trait]
impl Operation for HeadBucket {
    const NAME: &'static str = "bucket-head";
    const ABOUT: &'static str = "Check that a bucket exists and is accessible";

    type Request = BucketRequest;
    type Response = HeadBucketOutput;

    fn fields() -> FieldSpecs {
        bucket_only()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.head_bucket(request).await
    }
}

pub struct GetBucketLocation;

#[async_trait]
impl Operation for GetBucketLocation {
    const NAME: &'static str = "bucket-location-get";
    const ABOUT: &'static str = "Show the location constraint of a bucket";

    type Request = BucketRequest;
    type Response = BucketLocationOutput;

    fn fields() -> FieldSpecs {
        bucket_only()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.get_bucket_location(request).await
    }
}

pub struct GetBucketAcl;

#[async_trait]
impl Operation for GetBucketAcl {
    const NAME: &'static str = "bucket-acl-get";
    const ABOUT: &'static str = "Show the access control list of a bucket";

    type Request = BucketRequest;
    type Response = BucketAclOutput;

    fn fields() -> FieldSpecs {
        bucket_only()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.get_bucket_acl(request).await
    }
}

/// Replace a bucket's ACL with a canned ACL
pub struct PutBucketAcl;

#[async_trait]
impl Operation for PutBucketAcl {
    const NAME: &'static str = "bucket-acl-put";
    const ABOUT: &'static str = "Apply a canned ACL to a bucket";

    type Request = PutBucketAclRequest;
    type Response = BucketOutput;

    fn fields() -> FieldSpecs {
        bucket_only().mandatory("ACL", "acl", "Canned ACL, e.g. private or public-read")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.put_bucket_acl(request).await
    }
}
