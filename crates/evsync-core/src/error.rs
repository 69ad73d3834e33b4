//! Configuration errors.
//!
//! Everything in here is fatal for the whole run: these errors are raised
//! while the sources are resolved, before any feed is fetched.

use thiserror::Error;

/// An error in the loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source names a formatter outside the closed set.
    #[error("unknown formatter {key:?} for source {source_name:?}")]
    UnknownFormatter {
        /// Name of the offending source.
        source_name: String,
        /// The formatter key as written in the configuration.
        key: String,
    },

    /// The configured time zone is not a known IANA identifier.
    #[error("invalid time zone {0:?}")]
    InvalidTimezone(String),

    /// The display layout is not a valid strftime layout.
    #[error("invalid display layout {0:?}")]
    InvalidLayout(String),

    /// A source has no name.
    #[error("source #{index} has no name")]
    MissingName {
        /// Position of the source in the configuration.
        index: usize,
    },

    /// A source URL does not parse.
    #[error("invalid url {url:?} for source {source_name:?}: {error}")]
    InvalidUrl {
        /// Name of the offending source.
        source_name: String,
        /// The URL as written in the configuration.
        url: String,
        /// Underlying parse error.
        #[source]
        error: url::ParseError,
    },
}

/// A specialized Result type for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_formatter_display() {
        let err = ConfigError::UnknownFormatter {
            source_name: "F1".to_string(),
            key: "f9Formatter".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("f9Formatter"));
        assert!(display.contains("F1"));
    }

    #[test]
    fn invalid_url_keeps_source() {
        use std::error::Error;
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = ConfigError::InvalidUrl {
            source_name: "Space".to_string(),
            url: "not a url".to_string(),
            error: parse_err,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("Space"));
    }
}
