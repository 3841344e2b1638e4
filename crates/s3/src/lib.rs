//! cos-s3: S3 SDK adapter for the cos CLI
//!
//! This crate provides the implementation of the ObjectStorage trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
mod convert;
mod error;

pub use client::{S3Client, S3Connector};
