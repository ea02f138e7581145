//! view command - List the objects in the bucket
//!
//! Keys are printed one per line in the order the service returns them.

use bkt_core::{ObjectInfo, SyncConfig, list_all};
use bkt_s3::S3Client;
use clap::Args;
use serde::Serialize;

use super::require_bucket;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner, render};

/// List the objects in the bucket
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Show size and last-modified time in a table
    #[arg(short, long)]
    pub long: bool,
}

/// Output structure for view command (JSON format)
#[derive(Debug, Serialize)]
struct ViewOutput<'a> {
    bucket: &'a str,
    items: &'a [ObjectInfo],
}

/// Execute the view command
pub async fn execute(args: ViewArgs, config: &SyncConfig, formatter: &Formatter) -> ExitCode {
    let bucket = match require_bucket(config, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let client = S3Client::new(config).await;
    let spinner = Spinner::start(formatter.config(), &format!("Listing {bucket}..."));
    let result = list_all(&client, bucket).await;
    spinner.finish_and_clear();

    let items = match result {
        Ok(items) => items,
        Err(e) => {
            formatter.error(&format!("Failed to list bucket '{bucket}': {e}"));
            return ExitCode::from(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ViewOutput {
            bucket,
            items: &items,
        });
    } else if items.is_empty() {
        formatter.println(&format!("Bucket '{bucket}' is empty."));
    } else if args.long {
        formatter.println(&render::view_table(&items).to_string());
    } else {
        formatter.println(&render::view_text(&items));
    }

    ExitCode::Success
}
