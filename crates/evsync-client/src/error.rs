//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

use evsync_core::{ConfigError, TracingError};
use evsync_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end an `evsync` run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration content is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration file could not be read or parsed.
    #[error("configuration file {}: {message}", path.display())]
    ConfigFile {
        /// Path of the offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Provider setup failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Diagnostics could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

impl ClientError {
    pub(crate) fn config_file(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ConfigFile {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_error_names_path() {
        let err = ClientError::config_file("/etc/evsync.json", "expected `,`");
        assert_eq!(
            err.to_string(),
            "configuration file /etc/evsync.json: expected `,`"
        );
    }

    #[test]
    fn wraps_config_error() {
        let err: ClientError = ConfigError::InvalidTimezone("Mars/Base".to_string()).into();
        assert!(err.to_string().starts_with("configuration error: "));
        assert!(err.to_string().contains("Mars/Base"));
    }
}
