//! CDN cache invalidation

use std::future::Future;

use serde::Serialize;

use crate::error::Result;
use crate::path::{Target, invalidation_path};
use crate::traits::CdnInvalidator;

/// What `invalidate` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvalidationOutcome {
    /// No distribution is configured, nothing was sent
    Skipped,
    Submitted {
        id: String,
        state: String,
        paths: Vec<String>,
        caller_reference: String,
    },
}

/// Unique caller reference for one request
pub fn caller_reference() -> String {
    format!("bkt-{}", jiff::Timestamp::now().as_nanosecond())
}

/// Invalidate the cached copy of `target`, or everything for [`Target::All`]
///
/// Without a distribution ID this is a no-op.
pub async fn invalidate(
    cdn: &dyn CdnInvalidator,
    distribution_id: Option<&str>,
    target: &Target,
) -> Result<InvalidationOutcome> {
    let Some(distribution_id) = distribution_id else {
        tracing::info!("no CDN distribution configured, skipping invalidation");
        return Ok(InvalidationOutcome::Skipped);
    };

    let paths = vec![invalidation_path(target)];
    let caller_reference = caller_reference();
    tracing::debug!(distribution_id, ?paths, caller_reference = %caller_reference, "create_invalidation");

    let receipt = cdn
        .create_invalidation(distribution_id, paths.clone(), caller_reference.clone())
        .await?;

    Ok(InvalidationOutcome::Submitted {
        id: receipt.id,
        state: receipt.status,
        paths,
        caller_reference,
    })
}

/// Like [`invalidate`], but only builds the CDN client once a
/// distribution is known to be configured
pub async fn connect_and_invalidate<C, F, Fut>(
    distribution_id: Option<&str>,
    target: &Target,
    connect: F,
) -> Result<InvalidationOutcome>
where
    C: CdnInvalidator,
    F: FnOnce() -> Fut,
    Fut: Future<Output = C>,
{
    if distribution_id.is_none() {
        tracing::info!("no CDN distribution configured, skipping invalidation");
        return Ok(InvalidationOutcome::Skipped);
    }
    let cdn = connect().await;
    invalidate(&cdn, distribution_id, target).await
}
