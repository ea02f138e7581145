//! bkt - mirror a local folder to an S3 bucket
//!
//! Uploads, deletes, restores and lists objects in one bucket and
//! invalidates the CloudFront distribution in front of it.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bucketsync::commands::{self, Cli};

/// Filter used with `--debug`, covering this workspace's crates
const DEBUG_FILTER: &str = "warn,bkt=debug,bucketsync=debug,bkt_core=debug,bkt_s3=debug";

#[tokio::main]
async fn main() {
    // Values from .env feed clap's env fallbacks, so load them first
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
