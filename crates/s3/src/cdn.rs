//! CloudFront client implementation
//!
//! Wraps aws-sdk-cloudfront and implements the CdnInvalidator trait.

use async_trait::async_trait;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};

use bkt_core::{CdnInvalidator, Error, InvalidationReceipt, Result, SyncConfig};

use crate::sdk::{classify, load_sdk_config};

/// CloudFront client wrapper
pub struct CloudFrontClient {
    inner: aws_sdk_cloudfront::Client,
}

impl CloudFrontClient {
    pub async fn new(config: &SyncConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self {
            inner: aws_sdk_cloudfront::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl CdnInvalidator for CloudFrontClient {
    async fn create_invalidation(
        &self,
        distribution_id: &str,
        paths: Vec<String>,
        caller_reference: String,
    ) -> Result<InvalidationReceipt> {
        let quantity = paths.len() as i32;
        let paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(paths))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .create_invalidation()
            .distribution_id(distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| classify(e, distribution_id))?;

        let invalidation = response
            .invalidation()
            .ok_or_else(|| Error::General("CloudFront returned no invalidation".into()))?;

        Ok(InvalidationReceipt {
            id: invalidation.id().to_string(),
            status: invalidation.status().to_string(),
        })
    }
}
