//! Calendar source definitions.
//!
//! [`SourceConfig`] is the shape a source has in the configuration file;
//! [`EventSource`] is the validated form the pipeline works with.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::filter::KeywordFilter;
use crate::format::Formatter;

/// A calendar source as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Human-readable label.
    pub name: String,
    /// Address of the remote calendar feed.
    pub url: String,
    /// Destination tag carried through to output.
    pub channel: String,
    /// Space-separated keywords; empty means no filtering.
    pub filter: String,
    /// Space-separated base tags.
    pub tags: String,
    /// Notification flag carried through to output.
    pub notify: bool,
    /// Formatter key (e.g. `f1Formatter`).
    pub formatter: String,
}

/// A resolved calendar source.
///
/// Built by [`crate::resolve_sources`]; read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSource {
    /// Human-readable label.
    pub name: String,
    /// Address of the remote calendar feed.
    pub url: Url,
    /// Destination tag carried through to output.
    pub channel: String,
    /// Parsed keyword filter.
    pub filter: KeywordFilter,
    /// Space-separated base tags.
    pub tags: String,
    /// Notification flag carried through to output.
    pub notify: bool,
    /// Formatting strategy for this source's events.
    pub formatter: Formatter,
}

impl EventSource {
    /// Creates a source with no filter, tags or channel.
    pub fn new(name: impl Into<String>, url: Url, formatter: Formatter) -> Self {
        Self {
            name: name.into(),
            url,
            channel: String::new(),
            filter: KeywordFilter::default(),
            tags: String::new(),
            notify: false,
            formatter,
        }
    }

    /// Builder method to set the output channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Builder method to set the keyword filter.
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = KeywordFilter::parse(filter);
        self
    }

    /// Builder method to set the base tags.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Builder method to set the notify flag.
    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }
}
