//! Object operations

use async_trait::async_trait;

use cos_core::binding::FieldSpecs;
use cos_core::types::{
    CopyObjectOutput, CopyObjectRequest, DeleteObjectOutput, DeleteObjectsOutput,
    DeleteObjectsRequest, GetObjectOutput, GetObjectRequest, ListObjectsOutput, ListObjectsRequest,
    ObjectMetadata, ObjectRequest, PutObjectOutput, PutObjectRequest,
};
use cos_core::{ObjectStorage, Result};

use super::bucket::BUCKET_HELP;
use super::operation::Operation;

const KEY_HELP: &str = "Key of the object";
const VERSION_HELP: &str = "Version of the object";

fn bucket_and_key() -> FieldSpecs {
    FieldSpecs::new()
        .mandatory("Bucket", "bucket", BUCKET_HELP)
        .mandatory("Key", "key", KEY_HELP)
}

pub struct ListObjects;

#[async_trait]
impl Operation for ListObjects {
    const NAME: &'static str = "objects";
    const ABOUT: &'static str = "List the objects in a bucket";
    const EMPTY_MESSAGE: Option<&'static str> = Some("No objects found.");

    type Request = ListObjectsRequest;
    type Response = ListObjectsOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .optional("Prefix", "prefix", "Only list keys starting with this prefix")
            .optional("Delimiter", "delimiter", "Group keys sharing a prefix up to this character")
            .optional("StartAfter", "start-after", "Start listing after this key")
            .optional("MaxKeys", "max-keys", "Maximum number of keys to return")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.list_objects(request).await
    }
}

/// Upload a local file as an object
pub struct PutObject;

#[async_trait]
impl Operation for PutObject {
    const NAME: &'static str = "object-put";
    const ABOUT: &'static str = "Upload an object";
    const PROGRESS: Option<&'static str> = Some("Uploading");

    type Request = PutObjectRequest;
    type Response = PutObjectOutput;

    fn fields() -> FieldSpecs {
        bucket_and_key()
            .optional("Body", "body", "Local file to upload [default: empty object]")
            .optional("ContentType", "content-type", "MIME type [default: guessed from --body]")
            .optional("CacheControl", "cache-control", "Cache-Control header to store")
            .optional("StorageClass", "storage-class", "Storage class, e.g. STANDARD")
    }

    async fn call(store: &dyn ObjectStorage, mut request: Self::Request) -> Result<Self::Response> {
        if request.content_type.is_none() {
            request.content_type = request.body.as_deref().and_then(guess_content_type);
        }
        store.put_object(request).await
    }
}

fn guess_content_type(path: &str) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Download an object into a local file
pub struct GetObject;

#[async_trait]
impl Operation for GetObject {
    const NAME: &'static str = "object-get";
    const ABOUT: &'static str = "Download an object to a local file";
    const PROGRESS: Option<&'static str> = Some("Downloading");

    type Request = GetObjectRequest;
    type Response = GetObjectOutput;

    fn fields() -> FieldSpecs {
        bucket_and_key()
            .mandatory("OutFile", "out-file", "Local file to write the object to")
            .optional("VersionId", "version-id", VERSION_HELP)
            .optional("Range", "range", "Byte range to download, e.g. bytes=0-1023")
            .optional(
                "IfModifiedSince",
                "if-modified-since",
                "Only download if modified after this RFC 3339 time",
            )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.get_object(request).await
    }
}

pub struct HeadObject;

#[async_trait]
impl Operation for HeadObject {
    const NAME: &'static str = "object-head";
    const ABOUT: &'static str = "Show the metadata of an object";

    type Request = ObjectRequest;
    type Response = ObjectMetadata;

    fn fields() -> FieldSpecs {
        bucket_and_key().optional("VersionId", "version-id", VERSION_HELP)
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.head_object(request).await
    }
}

pub struct DeleteObject;

#[async_trait]
impl Operation for DeleteObject {
    const NAME: &'static str = "object-delete";
    const ABOUT: &'static str = "Delete an object";

    type Request = ObjectRequest;
    type Response = DeleteObjectOutput;

    fn fields() -> FieldSpecs {
        bucket_and_key().optional("VersionId", "version-id", VERSION_HELP)
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.delete_object(request).await
    }
}

/// Server-side copy
pub struct CopyObject;

#[async_trait]
impl Operation for CopyObject {
    const NAME: &'static str = "object-copy";
    const ABOUT: &'static str = "Copy an object within the service";

    type Request = CopyObjectRequest;
    type Response = CopyObjectOutput;

    fn fields() -> FieldSpecs {
        bucket_and_key().mandatory(
            "CopySource",
            "copy-source",
            "Source object as source-bucket/source-key",
        )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.copy_object(request).await
    }
}

/// Delete several objects in one request
pub struct DeleteObjects;

#[async_trait]
impl Operation for DeleteObjects {
    const NAME: &'static str = "objects-delete";
    const ABOUT: &'static str = "Delete several objects at once";

    type Request = DeleteObjectsRequest;
    type Response = DeleteObjectsOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .mandatory(
                "Delete",
                "delete",
                "Objects to delete, e.g. Objects=[{Key=a},{Key=b}],Quiet=false",
            )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.delete_objects(request).await
    }
}
