//! Time zone and display layout helpers.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{ConfigError, ConfigResult};

/// Parses an IANA time zone identifier (e.g. `Europe/Paris`).
pub fn parse_timezone(name: &str) -> ConfigResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}

/// A validated strftime layout used to render event start times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLayout(String);

impl DisplayLayout {
    /// Default layout: `2024-03-02 15:00`.
    pub const DEFAULT: &'static str = "%Y-%m-%d %H:%M";

    /// Validates a strftime layout.
    pub fn parse(layout: &str) -> ConfigResult<Self> {
        if layout.is_empty() || StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidLayout(layout.to_string()));
        }
        Ok(Self(layout.to_string()))
    }

    /// Returns the layout string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders a datetime with this layout.
    pub fn render<Z>(&self, dt: &DateTime<Z>) -> String
    where
        Z: TimeZone,
        Z::Offset: fmt::Display,
    {
        dt.format(&self.0).to_string()
    }
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}
