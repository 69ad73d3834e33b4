//! Client configuration.
//!
//! All settings live in a single file, `~/.evsync.json` by default. Files
//! with a `.toml` extension are read as TOML, anything else as JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use evsync_core::{DisplayLayout, EventSource, SourceConfig, parse_timezone, resolve_sources};

use crate::error::{ClientError, ClientResult};

/// Configuration for an evsync run, as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// strftime layout for the display time column.
    pub layout: String,

    /// IANA time zone events are shown in.
    pub tz: String,

    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Calendar feeds to aggregate.
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: DisplayLayout::DEFAULT.to_string(),
            tz: "UTC".to_string(),
            timeout_secs: 30,
            sources: Vec::new(),
        }
    }
}

/// Settings every worker reads during a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Zone event start times are shown in.
    pub tz: Tz,
    /// Layout of the display time column.
    pub layout: DisplayLayout,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            tz: Tz::UTC,
            layout: DisplayLayout::default(),
        }
    }
}

/// A configuration that passed validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Zone and layout shared by every worker.
    pub settings: RunSettings,
    /// Sources with their formatters resolved.
    pub sources: Vec<EventSource>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Config {
    /// Default configuration file name, relative to the home directory.
    pub const FILE_NAME: &'static str = ".evsync.json";

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ClientError::config_file(path, e))?;
        let config = Self::parse(path, &content)?;
        debug!(path = %path.display(), sources = config.sources.len(), "Loaded configuration");
        Ok(config)
    }

    fn parse(path: &Path, content: &str) -> ClientResult<Self> {
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str(content).map_err(|e| ClientError::config_file(path, e))
        } else {
            serde_json::from_str(content).map_err(|e| ClientError::config_file(path, e))
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::FILE_NAME)
    }

    /// Validates every setting and resolves each source's formatter.
    ///
    /// Nothing is fetched; an error here means the run must not start.
    pub fn resolve(&self) -> ClientResult<ResolvedConfig> {
        let tz = parse_timezone(&self.tz)?;
        let layout = DisplayLayout::parse(&self.layout)?;
        let sources = resolve_sources(&self.sources)?;

        Ok(ResolvedConfig {
            settings: RunSettings { tz, layout },
            sources,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
