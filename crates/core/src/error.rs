//! Error types for bkt-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bkt-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bkt-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path or key that cannot be mapped between the local root and the bucket
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or service error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::TomlParse(_) => 2,                                             // UsageError
            Error::Network(_) => 3,                                               // NetworkError
            Error::Auth(_) => 4,                                                  // AuthError
            Error::NotFound(_) => 5,                                              // NotFound
            _ => 1,                                                               // GeneralError
        }
    }
}
