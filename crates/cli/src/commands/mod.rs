//! CLI command definitions and execution
//!
//! Each command lives in its own module with an `Args` struct and an
//! `execute` function returning an [`ExitCode`].

use std::path::PathBuf;

use bkt_core::{ConfigLayer, ConfigManager, SyncConfig, SyncReport, Target};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, render};

mod completions;
mod delete;
mod invalidate;
mod restore;
mod upload;
mod view;

/// bkt - mirror a local folder to an S3 bucket
///
/// Uploads, deletes, restores and lists objects, and invalidates the
/// CloudFront cache in front of the bucket.
#[derive(Parser, Debug)]
#[command(name = "bkt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration overrides; each falls back to its environment variable
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "BKT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bucket name
    #[arg(long, global = true, env = "S3_BUCKET_NAME")]
    pub bucket: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long, global = true, env = "S3_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Local folder mirrored to the bucket [default: bucket]
    #[arg(long, global = true, env = "LOCAL_BUCKET_PATH")]
    pub local_root: Option<PathBuf>,

    /// CloudFront distribution ID used by `invalidate`
    #[arg(long, global = true, env = "CLOUDFRONT_DISTRIBUTION_ID")]
    pub distribution_id: Option<String>,

    /// Ignore file with one glob per line [default: .bucketignore]
    #[arg(long, global = true, env = "BUCKET_IGNORE_FILE")]
    pub ignore_file: Option<PathBuf>,
}

impl SettingsArgs {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            local_root: self.local_root.clone(),
            distribution_id: self.distribution_id.clone(),
            ignore_file: self.ignore_file.clone(),
            access_key: None,
            secret_key: None,
        }
    }

    /// Merge the configuration file with flags and environment
    pub fn resolve(&self) -> bkt_core::Result<SyncConfig> {
        let manager = match &self.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::discover(),
        };
        let file = manager.load()?;
        SyncConfig::from_layer(file.overlay(self.layer()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file, or every file with `.`, from the local folder
    Upload(TargetArgs),

    /// Delete an object, or every object with `.`, from the bucket (local files are kept)
    Delete(TargetArgs),

    /// Download an object, or every object with `.`, into the local folder
    Restore(TargetArgs),

    /// List the objects in the bucket
    View(view::ViewArgs),

    /// Invalidate a path, or everything with `.`, in the CloudFront cache
    Invalidate(invalidate::InvalidateArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// A single key relative to the local folder, or `.` for all
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Key relative to the local folder, or `.` for everything
    pub target: String,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    if let Commands::Completions(args) = cli.command {
        return completions::execute(args);
    }

    let formatter = Formatter::new(output_config);
    let config = match cli.settings.resolve() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from(&e);
        }
    };
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Upload(args) => upload::execute(args, &config, &formatter).await,
        Commands::Delete(args) => delete::execute(args, &config, &formatter).await,
        Commands::Restore(args) => restore::execute(args, &config, &formatter).await,
        Commands::View(args) => view::execute(args, &config, &formatter).await,
        Commands::Invalidate(args) => invalidate::execute(args, &config, &formatter).await,
        Commands::Completions(_) => unreachable!("handled above"),
    }
}

/// Parse a positional target, reporting a usage error on failure
fn parse_target(raw: &str, formatter: &Formatter) -> Result<Target, ExitCode> {
    Target::parse(raw).map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from(&e)
    })
}

/// The configured bucket, or a usage error before any remote call
fn require_bucket<'a>(config: &'a SyncConfig, formatter: &Formatter) -> Result<&'a str, ExitCode> {
    config.bucket().map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from(&e)
    })
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    command: &'static str,
    bucket: &'a str,
    #[serde(flatten)]
    report: &'a SyncReport,
    summary: bkt_core::Summary,
}

/// Print the closing output of a batch command and pick the exit code
fn finish_report(
    command: &'static str,
    bucket: &str,
    target: &Target,
    report: &SyncReport,
    empty_message: &str,
    formatter: &Formatter,
) -> ExitCode {
    let summary = report.summary();

    if formatter.is_json() {
        formatter.json(&ReportOutput {
            command,
            bucket,
            report,
            summary,
        });
    } else if report.empty_bucket {
        formatter.println(empty_message);
    } else if target.is_all() {
        let line = render::summary_line(&summary);
        if report.has_failures() {
            formatter.warning(&format!("Completed with errors: {line}"));
        } else {
            formatter.success(&line);
        }
    }

    if report.has_failures() {
        ExitCode::GeneralError
    } else {
        ExitCode::Success
    }
}
