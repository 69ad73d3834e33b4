//! One worker per source: fetch, decode, normalize, filter, format, send.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use evsync_core::EventSource;
use evsync_providers::{FeedDecoder, FeedFetcher, normalize_event};

use crate::config::RunSettings;

/// How a worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The feed was read to the end, or until its body broke off.
    Done {
        /// Records pushed to the sink.
        emitted: usize,
        /// Items dropped because they could not be decoded or normalized.
        skipped: usize,
    },
    /// The feed could not be opened; nothing was emitted.
    Aborted,
}

pub(crate) struct Worker {
    pub(crate) source: EventSource,
    pub(crate) fetcher: Arc<dyn FeedFetcher>,
    pub(crate) settings: Arc<RunSettings>,
    pub(crate) now: DateTime<Utc>,
    pub(crate) sink: mpsc::Sender<String>,
}

impl Worker {
    pub(crate) async fn run(self) -> WorkerOutcome {
        let source = &self.source;

        let stream = match self.fetcher.fetch(&source.url).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(source = %source.name, url = %source.url, error = %e, "Could not fetch calendar");
                return WorkerOutcome::Aborted;
            }
        };
        debug!(source = %source.name, "Decoding feed");

        let mut decoder = FeedDecoder::new(stream);
        let mut emitted = 0;
        let mut skipped = 0;

        while let Some(item) = decoder.next_event().await {
            let raw = match item {
                Ok(raw) => raw,
                Err(e) if e.is_terminal() => {
                    warn!(source = %source.name, error = %e, "Feed ended early");
                    continue;
                }
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Skipping undecodable event");
                    skipped += 1;
                    continue;
                }
            };

            let event = match normalize_event(&raw, self.settings.tz, self.now) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Skipping event");
                    skipped += 1;
                    continue;
                }
            };

            if !source.filter.matches(&event.summary) {
                continue;
            }

            let display_time = self.settings.layout.render(&event.start);
            let line = source
                .formatter
                .format(source, &event.summary, &display_time)
                .to_line();

            if self.sink.send(line).await.is_err() {
                debug!(source = %source.name, "Output closed, stopping");
                break;
            }
            emitted += 1;
        }

        debug!(source = %source.name, emitted, skipped, "Feed done");
        WorkerOutcome::Done { emitted, skipped }
    }
}
