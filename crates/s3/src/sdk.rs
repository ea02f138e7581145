//! Shared SDK setup and error mapping

use aws_sdk_s3::error::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use bkt_core::{Error, SyncConfig};

/// Load the shared SDK configuration for both service clients
///
/// Static credentials from the config file take precedence; otherwise the
/// default provider chain (environment, profile, instance metadata) applies.
pub(crate) async fn load_sdk_config(config: &SyncConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(creds) = &config.credentials {
        tracing::debug!("using static credentials from the configuration file");
        let credentials = aws_credential_types::Credentials::new(
            creds.access_key.clone(),
            creds.secret_key.clone(),
            None, // session token
            None, // expiry
            "bkt-static-credentials",
        );
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}

/// Convert an SDK failure into a core error, keeping the service error code
pub(crate) fn classify<E, R>(err: SdkError<E, R>, subject: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    classify_code(code.as_deref(), subject, message)
}

fn classify_code(code: Option<&str>, subject: &str, message: String) -> Error {
    match code {
        Some("NoSuchKey" | "NotFound" | "NoSuchBucket" | "NoSuchDistribution") => {
            Error::NotFound(subject.to_string())
        }
        Some(
            "AccessDenied"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken"
            | "InvalidClientTokenId",
        ) => Error::Auth(format!("{subject}: {message}")),
        _ => Error::Network(format!("{subject}: {message}")),
    }
}
