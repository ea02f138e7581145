//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bkt-core.

use async_trait::async_trait;

use bkt_core::{Error, ListPage, ObjectInfo, ObjectStore, Result, SyncConfig};

use crate::sdk::{classify, load_sdk_config};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from the resolved configuration
    ///
    /// A custom endpoint switches to path-style addressing for
    /// S3-compatible services.
    pub async fn new(config: &SyncConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let Some(endpoint) = &config.endpoint {
            tracing::debug!(endpoint = %endpoint, "using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| classify(e, bucket))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info =
                    ObjectInfo::new(object.key().unwrap_or_default(), object.size().unwrap_or(0));

                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }

                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                info
            })
            .collect();

        let continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage {
            items,
            continuation_token,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(e, key))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, key))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(format!("{key}: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, key))?;

        Ok(())
    }
}
