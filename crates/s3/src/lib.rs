//! bkt-s3: AWS SDK adapters for bkt
//!
//! This crate provides the implementations of the ObjectStore and
//! CdnInvalidator traits using aws-sdk-s3 and aws-sdk-cloudfront. It is the
//! only crate that directly depends on the AWS SDK.

pub mod cdn;
pub mod client;
mod sdk;

pub use cdn::CloudFrontClient;
pub use client::S3Client;
