//! Multipart upload operations
//!
//! A multipart upload is created, fed with numbered parts, then completed
//! with the ETag of every part, or aborted.

use async_trait::async_trait;

use cos_core::binding::FieldSpecs;
use cos_core::types::{
    AbortMultipartUploadOutput, CompleteMultipartUploadOutput, CompleteMultipartUploadRequest,
    CreateMultipartUploadOutput, CreateMultipartUploadRequest, ListMultipartUploadsOutput,
    ListMultipartUploadsRequest, ListPartsOutput, ListPartsRequest, UploadPartOutput,
    UploadPartRequest, UploadRequest,
};
use cos_core::{ObjectStorage, Result};

use super::bucket::BUCKET_HELP;
use super::operation::Operation;

const UPLOAD_ID_HELP: &str = "ID returned by multipart-create";

fn upload() -> FieldSpecs {
    FieldSpecs::new()
        .mandatory("Bucket", "bucket", BUCKET_HELP)
        .mandatory("Key", "key", "Key of the object being uploaded")
        .mandatory("UploadId", "upload-id", UPLOAD_ID_HELP)
}

pub struct CreateMultipartUpload;

#[async_trait]
impl Operation for CreateMultipartUpload {
    const NAME: &'static str = "multipart-create";
    const ABOUT: &'static str = "Start a multipart upload";

    type Request = CreateMultipartUploadRequest;
    type Response = CreateMultipartUploadOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .mandatory("Key", "key", "Key of the object to create")
            .optional("ContentType", "content-type", "MIME type of the final object")
            .optional("StorageClass", "storage-class", "Storage class, e.g. STANDARD")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.create_multipart_upload(request).await
    }
}

pub struct CompleteMultipartUpload;

#[async_trait]
impl Operation for CompleteMultipartUpload {
    const NAME: &'static str = "multipart-complete";
    const ABOUT: &'static str = "Assemble the uploaded parts into an object";

    type Request = CompleteMultipartUploadRequest;
    type Response = CompleteMultipartUploadOutput;

    fn fields() -> FieldSpecs {
        upload().mandatory(
            "MultipartUpload",
            "multipart-upload",
            "Parts to assemble, e.g. Parts=[{ETag=etag1,PartNumber=1},{ETag=etag2,PartNumber=2}]",
        )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.complete_multipart_upload(request).await
    }
}

pub struct AbortMultipartUpload;

#[async_trait]
impl Operation for AbortMultipartUpload {
    const NAME: &'static str = "multipart-abort";
    const ABOUT: &'static str = "Abort a multipart upload and discard its parts";

    type Request = UploadRequest;
    type Response = AbortMultipartUploadOutput;

    fn fields() -> FieldSpecs {
        upload()
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.abort_multipart_upload(request).await
    }
}

pub struct ListMultipartUploads;

#[async_trait]
impl Operation for ListMultipartUploads {
    const NAME: &'static str = "multipart-uploads";
    const ABOUT: &'static str = "List the in-progress multipart uploads of a bucket";
    const EMPTY_MESSAGE: Option<&'static str> = Some("No multipart uploads in progress.");

    type Request = ListMultipartUploadsRequest;
    type Response = ListMultipartUploadsOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .optional("Prefix", "prefix", "Only list uploads for keys with this prefix")
            .optional("MaxUploads", "max-uploads", "Maximum number of uploads to return")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.list_multipart_uploads(request).await
    }
}

/// Upload one part from a local file
pub struct UploadPart;

#[async_trait]
impl Operation for UploadPart {
    const NAME: &'static str = "part-upload";
    const ABOUT: &'static str = "Upload one part of a multipart upload";
    const PROGRESS: Option<&'static str> = Some("Uploading part");

    type Request = UploadPartRequest;
    type Response = UploadPartOutput;

    fn fields() -> FieldSpecs {
        upload()
            .mandatory("PartNumber", "part-number", "Part number, 1 to 10000")
            .mandatory("Body", "body", "Local file holding the part data")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.upload_part(request).await
    }
}

pub struct ListParts;

#[async_trait]
impl Operation for ListParts {
    const NAME: &'static str = "parts";
    const ABOUT: &'static str = "List the parts uploaded so far";
    const EMPTY_MESSAGE: Option<&'static str> = Some("No parts uploaded yet.");

    type Request = ListPartsRequest;
    type Response = ListPartsOutput;

    fn fields() -> FieldSpecs {
        upload().optional("MaxParts", "max-parts", "Maximum number of parts to return")
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.list_parts(request).await
    }
}
