//! Remote service traits
//!
//! `ObjectStore` and `CdnInvalidator` decouple the sync logic from the AWS
//! SDK. The bkt-s3 crate implements both; tests use mocks or in-memory fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// One object from a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: size,
            last_modified: None,
            etag: None,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects on this page, in the service's order
    pub items: Vec<ObjectInfo>,

    /// Token for the next page; `None` on the last page
    pub continuation_token: Option<String>,
}

/// Receipt for a submitted invalidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationReceipt {
    /// Invalidation ID assigned by the CDN
    pub id: String,

    /// Status reported at submission, e.g. `InProgress`
    pub status: String,
}

/// Object storage operations used by bkt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of objects in `bucket`
    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage>;

    /// Store `data` under `key` with the given content type
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Get object content as bytes
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Delete one object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

/// CDN cache invalidation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CdnInvalidator: Send + Sync {
    /// Submit one invalidation for `paths` on `distribution_id`
    async fn create_invalidation(
        &self,
        distribution_id: &str,
        paths: Vec<String>,
        caller_reference: String,
    ) -> Result<InvalidationReceipt>;
}

/// Follow continuation tokens until the listing is exhausted
pub async fn list_all(store: &dyn ObjectStore, bucket: &str) -> Result<Vec<ObjectInfo>> {
    let mut items = Vec::new();
    let mut continuation_token = None;

    loop {
        let page = store.list_objects(bucket, continuation_token).await?;
        tracing::debug!(bucket, count = page.items.len(), "listed page");
        items.extend(page.items);

        match page.continuation_token {
            Some(token) => continuation_token = Some(token),
            None => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_object_info_new() {
        let info = ObjectInfo::new("test.txt", 1024);
        assert_eq!(info.key, "test.txt");
        assert_eq!(info.size_bytes, 1024);
        assert!(info.last_modified.is_none());
    }

    #[tokio::test]
    async fn test_list_all_follows_tokens() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(3)
            .returning(|_, token| {
                let (key, next) = match token.as_deref() {
                    None => ("a.txt", Some("p2")),
                    Some("p2") => ("b/c.txt", Some("p3")),
                    Some(_) => ("d.txt", None),
                };
                Ok(ListPage {
                    items: vec![ObjectInfo::new(key, 1)],
                    continuation_token: next.map(str::to_string),
                })
            });

        let items = list_all(&store, "bucket").await.unwrap();
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["a.txt", "b/c.txt", "d.txt"]);
    }

    #[tokio::test]
    async fn test_list_all_propagates_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Err(Error::Auth("AccessDenied".into())));

        let result = list_all(&store, "bucket").await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }
}
