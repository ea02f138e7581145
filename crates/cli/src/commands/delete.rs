//! delete command - Remove objects from the bucket
//!
//! Only the remote copy is removed; the local folder is left alone.

use bkt_core::{IgnoreRules, SyncConfig, Syncer};
use bkt_s3::S3Client;

use super::{TargetArgs, finish_report, parse_target, require_bucket};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Execute the delete command
pub async fn execute(args: TargetArgs, config: &SyncConfig, formatter: &Formatter) -> ExitCode {
    let target = match parse_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let bucket = match require_bucket(config, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let client = S3Client::new(config).await;
    let rules = IgnoreRules::default();
    let syncer = Syncer::new(&client, bucket, &config.local_root, &rules);

    match syncer.delete(&target, |o| formatter.outcome(o)).await {
        Ok(report) => finish_report(
            "delete",
            bucket,
            &target,
            &report,
            "Bucket is already empty.",
            formatter,
        ),
        Err(e) => {
            formatter.error(&format!("Failed to list bucket '{bucket}': {e}"));
            ExitCode::from(&e)
        }
    }
}
