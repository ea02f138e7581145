//! invalidate command - Purge paths from the CloudFront cache
//!
//! Works without a bucket name. When no distribution is configured the
//! command prints a notice and succeeds.

use bkt_core::{InvalidationOutcome, SyncConfig, connect_and_invalidate};
use bkt_s3::CloudFrontClient;
use clap::Args;

use super::parse_target;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Invalidate cached paths
#[derive(Args, Debug)]
pub struct InvalidateArgs {
    /// Path to invalidate (leading `/` optional), or `.` for everything
    pub path: String,
}

/// Execute the invalidate command
pub async fn execute(args: InvalidateArgs, config: &SyncConfig, formatter: &Formatter) -> ExitCode {
    let target = match parse_target(&args.path, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let distribution_id = config.distribution_id.as_deref();
    let connect = || CloudFrontClient::new(config);
    let outcome = match connect_and_invalidate(distribution_id, &target, connect).await {
        Ok(outcome) => outcome,
        Err(e) => {
            formatter.error(&format!("Failed to create invalidation: {e}"));
            return ExitCode::from(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&outcome);
        return ExitCode::Success;
    }

    match &outcome {
        InvalidationOutcome::Skipped => formatter.println(
            "No CloudFront distribution configured (set CLOUDFRONT_DISTRIBUTION_ID). Skipping invalidation.",
        ),
        InvalidationOutcome::Submitted {
            id, state, paths, ..
        } => formatter.success(&format!(
            "Invalidation {id} created for {} ({state})",
            paths.join(", ")
        )),
    }

    ExitCode::Success
}
