//! Source registry: turns configured sources into resolved [`EventSource`]s.

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::filter::KeywordFilter;
use crate::format::Formatter;
use crate::source::{EventSource, SourceConfig};

/// Resolves every configured source.
///
/// Fails on the first source with an unknown formatter key, a missing name or
/// an unparseable URL. Nothing is fetched before this succeeds.
pub fn resolve_sources(configs: &[SourceConfig]) -> ConfigResult<Vec<EventSource>> {
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| resolve_source(index, config))
        .collect()
}

fn resolve_source(index: usize, config: &SourceConfig) -> ConfigResult<EventSource> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::MissingName { index });
    }

    let formatter =
        Formatter::from_key(&config.formatter).ok_or_else(|| ConfigError::UnknownFormatter {
            source_name: config.name.clone(),
            key: config.formatter.clone(),
        })?;

    let url = Url::parse(&config.url).map_err(|error| ConfigError::InvalidUrl {
        source_name: config.name.clone(),
        url: config.url.clone(),
        error,
    })?;

    debug!(source = %config.name, formatter = formatter.key(), "Resolved source");

    Ok(EventSource {
        name: config.name.clone(),
        url,
        channel: config.channel.clone(),
        filter: KeywordFilter::parse(&config.filter),
        tags: config.tags.clone(),
        notify: config.notify,
        formatter,
    })
}
