//! Mapping of SDK failures to cos-core errors

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};

use cos_core::Error;

/// Convert an SDK error, prefixing the message with what was being accessed
pub(crate) fn map_sdk_error<E>(err: SdkError<E, HttpResponse>, context: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err.code().map(str::to_string);
    let status = err.raw_response().map(|r| r.status().as_u16());
    let message = err
        .message()
        .map(str::to_string)
        .or_else(|| code.clone())
        .unwrap_or_else(|| err.to_string());

    tracing::debug!(?code, ?status, context, "request failed");
    classify(code.as_deref(), status, format!("{context}: {message}"))
}

/// Pick the error kind from the service error code, or the HTTP status when
/// the response had no body (HEAD requests)
pub(crate) fn classify(code: Option<&str>, status: Option<u16>, detail: String) -> Error {
    match (code, status) {
        (Some("NoSuchBucket" | "NoSuchKey" | "NoSuchUpload" | "NotFound"), _) | (None, Some(404)) => {
            Error::NotFound(detail)
        }
        (
            Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "Forbidden"),
            _,
        )
        | (None, Some(401 | 403)) => Error::Auth(detail),
        (Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty"), _)
        | (None, Some(409)) => Error::Conflict(detail),
        _ => Error::Network(detail),
    }
}
