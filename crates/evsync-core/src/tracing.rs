//! Diagnostics setup.
//!
//! Everything is written to stderr; stdout carries record lines only.
//! `RUST_LOG` overrides the configured level when set.

use std::io;

use thiserror::Error;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// The global subscriber could not be installed.
#[derive(Debug, Error)]
#[error("failed to set global tracing subscriber: {0}")]
pub struct TracingError(#[from] SetGlobalDefaultError);

/// Layout of each diagnostic record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Level and layout of stderr diagnostics.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when `RUST_LOG` is unset.
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Adds module path, file and line to every record.
    pub verbose: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            verbose: false,
        }
    }
}

impl TracingConfig {
    /// Settings for `--debug` runs.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            verbose: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_level.to_string()))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(self.verbose)
            .with_file(self.verbose)
            .with_line_number(self.verbose);

        match self.output_format {
            TracingOutputFormat::Compact => layer.compact().boxed(),
            TracingOutputFormat::Pretty => layer.pretty().boxed(),
            TracingOutputFormat::Json => layer.json().boxed(),
        }
    }
}

/// Installs the global subscriber. Call once, before any work starts.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = tracing_subscriber::registry()
        .with(config.layer())
        .with(config.filter());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
