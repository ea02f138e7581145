//! Configuration management
//!
//! Settings come from three layers, lowest precedence first: an optional
//! TOML file, the environment, and command-line flags. The CLI collects the
//! upper two layers through clap; this module owns the file layer, the
//! merge, and the defaults. The result is a single [`SyncConfig`] that is
//! built once at startup and handed to every operation by reference.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Local folder mirrored to the bucket when none is configured
pub const DEFAULT_LOCAL_ROOT: &str = "bucket";

/// Ignore file read from the working directory when none is configured
pub const DEFAULT_IGNORE_FILE: &str = ".bucketignore";

/// Name of the project-local configuration file
pub const CONFIG_FILE_NAME: &str = "bkt.toml";

/// One layer of optional settings
///
/// The same shape is deserialized from the TOML file and filled from
/// environment variables and flags by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    /// Bucket name
    pub bucket: Option<String>,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,

    /// Local folder mirrored to the bucket
    pub local_root: Option<PathBuf>,

    /// CloudFront distribution to invalidate
    pub distribution_id: Option<String>,

    /// Path of the ignore file
    pub ignore_file: Option<PathBuf>,

    /// Static access key ID
    pub access_key: Option<String>,

    /// Static secret access key
    pub secret_key: Option<String>,
}

impl ConfigLayer {
    /// Merge `upper` on top of `self`; values set in `upper` win
    pub fn overlay(self, upper: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            bucket: upper.bucket.or(self.bucket),
            region: upper.region.or(self.region),
            endpoint: upper.endpoint.or(self.endpoint),
            local_root: upper.local_root.or(self.local_root),
            distribution_id: upper.distribution_id.or(self.distribution_id),
            ignore_file: upper.ignore_file.or(self.ignore_file),
            access_key: upper.access_key.or(self.access_key),
            secret_key: upper.secret_key.or(self.secret_key),
        }
    }
}

/// Static credentials taken from the configuration file
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Bucket name; only `invalidate` may run without it
    pub bucket: Option<String>,
    pub region: String,
    pub endpoint: Option<String>,
    /// When `None`, the SDK default credential chain is used
    pub credentials: Option<StaticCredentials>,
    pub local_root: PathBuf,
    pub distribution_id: Option<String>,
    pub ignore_file: PathBuf,
}

impl SyncConfig {
    /// Apply defaults and validate a merged layer
    pub fn from_layer(layer: ConfigLayer) -> Result<Self> {
        let endpoint = non_empty(layer.endpoint);
        if let Some(endpoint) = &endpoint {
            url::Url::parse(endpoint)?;
        }

        let credentials = match (non_empty(layer.access_key), non_empty(layer.secret_key)) {
            (Some(access_key), Some(secret_key)) => Some(StaticCredentials {
                access_key,
                secret_key,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "access_key and secret_key must be set together".into(),
                ));
            }
        };

        Ok(Self {
            bucket: non_empty(layer.bucket),
            region: non_empty(layer.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint,
            credentials,
            local_root: non_empty_path(layer.local_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_ROOT)),
            distribution_id: non_empty(layer.distribution_id),
            ignore_file: non_empty_path(layer.ignore_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IGNORE_FILE)),
        })
    }

    /// The bucket name, or a configuration error when it is missing
    pub fn bucket(&self) -> Result<&str> {
        self.bucket.as_deref().ok_or_else(|| {
            Error::Config(
                "bucket name is not set. Set S3_BUCKET_NAME in your environment or .env file"
                    .into(),
            )
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}

/// Locates and loads the optional configuration file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
    required: bool,
}

impl ConfigManager {
    /// Use an explicit configuration file; it must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            required: true,
        }
    }

    /// Look for `./bkt.toml`, then `<config dir>/bkt/config.toml`
    ///
    /// Neither file has to exist.
    pub fn discover() -> Self {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self {
                config_path: local,
                required: false,
            };
        }

        let user = dirs::config_dir().map(|dir| dir.join("bkt").join("config.toml"));
        Self {
            config_path: user.filter(|p| p.is_file()).unwrap_or(local),
            required: false,
        }
    }

    /// Load the file layer
    ///
    /// A missing discovered file yields an empty layer.
    pub fn load(&self) -> Result<ConfigLayer> {
        if !self.config_path.exists() {
            if self.required {
                return Err(Error::Config(format!(
                    "configuration file not found: {}",
                    self.config_path.display()
                )));
            }
            return Ok(ConfigLayer::default());
        }

        tracing::debug!(path = %self.config_path.display(), "loading configuration file");
        let content = std::fs::read_to_string(&self.config_path)?;
        Ok(toml::from_str(&content)?)
    }
}
