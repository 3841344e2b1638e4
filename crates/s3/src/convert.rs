//! Conversions between cos-core models and aws-sdk-s3 types

use aws_sdk_s3::types as sdk;
use aws_smithy_types::DateTime;

use cos_core::types::{CompletedMultipartUpload, CorsConfiguration, CorsRule, Delete};
use cos_core::{Error, Result};

pub(crate) fn timestamp(value: Option<&DateTime>) -> Option<jiff::Timestamp> {
    value.and_then(|dt| jiff::Timestamp::from_second(dt.secs()).ok())
}

pub(crate) fn datetime(value: jiff::Timestamp) -> DateTime {
    DateTime::from_secs(value.as_second())
}

/// Narrow a bound 64-bit integer to the 32-bit width the SDK expects
pub(crate) fn int32(field: &str, value: i64) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Error::General(format!("{field} {value} is out of range for this request")))
}

pub(crate) fn opt_int32(field: &str, value: Option<i64>) -> Result<Option<i32>> {
    value.map(|v| int32(field, v)).transpose()
}

fn build_error(what: &str, err: impl std::fmt::Display) -> Error {
    Error::General(format!("Invalid {what}: {err}"))
}

pub(crate) fn delete(delete: Delete) -> Result<sdk::Delete> {
    let objects = delete
        .objects
        .into_iter()
        .map(|o| {
            sdk::ObjectIdentifier::builder()
                .key(o.key)
                .set_version_id(o.version_id)
                .build()
                .map_err(|e| build_error("object identifier", e))
        })
        .collect::<Result<Vec<_>>>()?;

    sdk::Delete::builder()
        .set_objects(Some(objects))
        .set_quiet(delete.quiet)
        .build()
        .map_err(|e| build_error("delete request", e))
}

pub(crate) fn completed_upload(upload: CompletedMultipartUpload) -> Result<sdk::CompletedMultipartUpload> {
    let parts = upload
        .parts
        .into_iter()
        .map(|p| {
            Ok(sdk::CompletedPart::builder()
                .e_tag(p.e_tag)
                .part_number(int32("PartNumber", p.part_number)?)
                .build())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sdk::CompletedMultipartUpload::builder()
        .set_parts(Some(parts))
        .build())
}

pub(crate) fn cors_configuration(config: CorsConfiguration) -> Result<sdk::CorsConfiguration> {
    let rules = config
        .cors_rules
        .into_iter()
        .map(|rule| {
            sdk::CorsRule::builder()
                .set_id(rule.id)
                .set_allowed_headers(non_empty(rule.allowed_headers))
                .set_allowed_methods(Some(rule.allowed_methods))
                .set_allowed_origins(Some(rule.allowed_origins))
                .set_expose_headers(non_empty(rule.expose_headers))
                .set_max_age_seconds(opt_int32("MaxAgeSeconds", rule.max_age_seconds)?)
                .build()
                .map_err(|e| build_error("CORS rule", e))
        })
        .collect::<Result<Vec<_>>>()?;

    sdk::CorsConfiguration::builder()
        .set_cors_rules(Some(rules))
        .build()
        .map_err(|e| build_error("CORS configuration", e))
}

pub(crate) fn cors_rule(rule: &sdk::CorsRule) -> CorsRule {
    CorsRule {
        id: rule.id().map(str::to_string),
        allowed_headers: rule.allowed_headers().to_vec(),
        allowed_methods: rule.allowed_methods().to_vec(),
        allowed_origins: rule.allowed_origins().to_vec(),
        expose_headers: rule.expose_headers().to_vec(),
        max_age_seconds: rule.max_age_seconds().map(i64::from),
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}
