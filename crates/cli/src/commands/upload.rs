//! upload command - Send local files to the bucket
//!
//! Files whose key matches the ignore file are skipped and reported.

use bkt_core::{IgnoreRules, SyncConfig, Syncer};
use bkt_s3::S3Client;

use super::{TargetArgs, finish_report, parse_target, require_bucket};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Execute the upload command
pub async fn execute(args: TargetArgs, config: &SyncConfig, formatter: &Formatter) -> ExitCode {
    let target = match parse_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let bucket = match require_bucket(config, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let rules = match IgnoreRules::load(&config.ignore_file) {
        Ok(rules) => rules,
        Err(e) => {
            formatter.error(&format!(
                "Failed to read ignore file {}: {e}",
                config.ignore_file.display()
            ));
            return ExitCode::from(&e);
        }
    };
    tracing::debug!(patterns = rules.len(), "loaded ignore rules");

    let client = S3Client::new(config).await;
    let syncer = Syncer::new(&client, bucket, &config.local_root, &rules);

    match syncer.upload(&target, |o| formatter.outcome(o)).await {
        Ok(report) => finish_report("upload", bucket, &target, &report, "", formatter),
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}
