//! Bucket configuration operations: CORS rules and versioning

use async_trait::async_trait;

use cos_core::binding::FieldSpecs;
use cos_core::types::{
    BucketOutput, BucketRequest, CorsConfiguration, PutBucketCorsRequest,
    PutBucketVersioningRequest, VersioningConfiguration,
};
use cos_core::{ObjectStorage, Result};

use super::bucket::BUCKET_HELP;
use super::operation::Operation;

pub struct GetBucketCors;

#[async_trait]
impl Operation for GetBucketCors {
    const NAME: &'static str = "bucket-cors-get";
    const ABOUT: &'static str = "Show the CORS rules of a bucket";
    const EMPTY_MESSAGE: Option<&'static str> =
        Some("The CORS configuration has never been set on this bucket.");

    type Request = BucketRequest;
    type Response = CorsConfiguration;

    fn fields() -> FieldSpecs {
        FieldSpecs::new().mandatory("Bucket", "bucket", BUCKET_HELP)
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.get_bucket_cors(request).await
    }
}

/// Replace the CORS rules of a bucket
pub struct PutBucketCors;

#[async_trait]
impl Operation for PutBucketCors {
    const NAME: &'static str = "bucket-cors-put";
    const ABOUT: &'static str = "Set the CORS rules of a bucket";

    type Request = PutBucketCorsRequest;
    type Response = BucketOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .mandatory(
                "CORSConfiguration",
                "cors-configuration",
                "CORS rules as shorthand or JSON, e.g. \
                 CORSRules=[{AllowedMethods=[GET],AllowedOrigins=[*]}]",
            )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.put_bucket_cors(request).await
    }
}

pub struct DeleteBucketCors;

#[async_trait]
impl Operation for DeleteBucketCors {
    const NAME: &'static str = "bucket-cors-delete";
    const ABOUT: &'static str = "Remove all CORS rules from a bucket";

    type Request = BucketRequest;
    type Response = BucketOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new().mandatory("Bucket", "bucket", BUCKET_HELP)
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.delete_bucket_cors(request).await
    }
}

pub struct GetBucketVersioning;

#[async_trait]
impl Operation for GetBucketVersioning {
    const NAME: &'static str = "bucket-versioning-get";
    const ABOUT: &'static str = "Show the versioning state of a bucket";
    const EMPTY_MESSAGE: Option<&'static str> =
        Some("Versioning has never been configured on this bucket.");

    type Request = BucketRequest;
    type Response = VersioningConfiguration;

    fn fields() -> FieldSpecs {
        FieldSpecs::new().mandatory("Bucket", "bucket", BUCKET_HELP)
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.get_bucket_versioning(request).await
    }
}

pub struct PutBucketVersioning;

#[async_trait]
impl Operation for PutBucketVersioning {
    const NAME: &'static str = "bucket-versioning-put";
    const ABOUT: &'static str = "Enable or suspend versioning on a bucket";

    type Request = PutBucketVersioningRequest;
    type Response = BucketOutput;

    fn fields() -> FieldSpecs {
        FieldSpecs::new()
            .mandatory("Bucket", "bucket", BUCKET_HELP)
            .mandatory(
                "VersioningConfiguration",
                "versioning-configuration",
                "Versioning state, e.g. Status=Enabled",
            )
    }

    async fn call(store: &dyn ObjectStorage, request: Self::Request) -> Result<Self::Response> {
        store.put_bucket_versioning(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::operation::dispatch;
    use crate::commands::operation::testing::{CountingConnector, MockStorage, call, session};
    use cos_core::types::CorsRule;

    #[test]
    fn test_declarations_match_request_types() {
        GetBucketCors::fields().check::<BucketRequest>().unwrap();
        PutBucketCors::fields().check::<PutBucketCorsRequest>().unwrap();
        PutBucketVersioning::fields()
            .check::<PutBucketVersioningRequest>()
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_cors_binds_rules_in_order() {
        let mut storage = MockStorage::new();
        storage
            .expect_put_bucket_cors()
            .withf(|r| {
                let rules = &r.cors_configuration.cors_rules;
                rules.len() == 2
                    && rules[0].allowed_methods == ["GET"]
                    && rules[1].allowed_methods == ["PUT", "POST"]
                    && rules[1].max_age_seconds == Some(300)
            })
            .times(1)
            .returning(|r| Ok(BucketOutput { bucket: r.bucket }));
        let connector = Arc::new(CountingConnector::with_storage(storage));

        dispatch(
            &call(&[
                "bucket-cors-put",
                "--bucket",
                "site",
                "--cors-configuration",
                "CORSRules=[{AllowedMethods=[GET],AllowedOrigins=[*]},\
                 {AllowedMethods=[PUT,POST],AllowedOrigins=[https://example.com],MaxAgeSeconds=300}]",
            ]),
            &session(connector.clone()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_put_cors_accepts_json() {
        let mut storage = MockStorage::new();
        storage
            .expect_put_bucket_cors()
            .withf(|r| {
                r.cors_configuration.cors_rules
                    == [CorsRule {
                        allowed_methods: vec!["HEAD".into()],
                        allowed_origins: vec!["*".into()],
                        ..Default::default()
                    }]
            })
            .times(1)
            .returning(|r| Ok(BucketOutput { bucket: r.bucket }));
        let connector = Arc::new(CountingConnector::with_storage(storage));

        dispatch(
            &call(&[
                "bucket-cors-put",
                "--bucket",
                "site",
                "--cors-configuration",
                r#"{"CORSRules":[{"AllowedMethods":["HEAD"],"AllowedOrigins":["*"]}]}"#,
            ]),
            &session(connector.clone()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_bad_cors_method_never_connects() {
        let connector = Arc::new(CountingConnector::default());

        let err = dispatch(
            &call(&[
                "bucket-cors-put",
                "--bucket",
                "site",
                "--cors-configuration",
                "CORSRules=[{AllowedMethods=[FETCH],AllowedOrigins=[*]}]",
            ]),
            &session(connector.clone()),
        )
        .await
        .unwrap_err();
        assert!(err.is_usage());
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_versioning_status_is_validated() {
        let connector = Arc::new(CountingConnector::default());

        let err = dispatch(
            &call(&[
                "bucket-versioning-put",
                "--bucket",
                "site",
                "--versioning-configuration",
                "Status=On",
            ]),
            &session(connector.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for 'VersioningConfiguration.Status': 'On' is not one of: Enabled, Suspended"
        );
        assert_eq!(connector.connects(), 0);
    }
}
