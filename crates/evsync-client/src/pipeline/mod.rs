//! The fetch/filter/format/merge pipeline.
//!
//! ```text
//!   source 1 ──► Worker ──┐
//!   source 2 ──► Worker ──┼──► mpsc (1 slot) ──► drain ──► out
//!   source N ──► Worker ──┘
//! ```
//!
//! Each source gets its own task. Workers share nothing but the read-only
//! [`RunSettings`] and the sender side of the sink; the channel closes once
//! the last worker drops its sender, which ends the drain.

mod merge;
#[cfg(test)]
pub(crate) mod testing;
mod worker;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use evsync_core::EventSource;
use evsync_providers::FeedFetcher;

use crate::config::RunSettings;
use crate::error::ClientResult;

pub use worker::WorkerOutcome;

/// Slots in the merge channel. Senders wait for the writer after each line.
const SINK_CAPACITY: usize = 1;

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines written to the output.
    pub written: usize,
    /// Workers that read their feed.
    pub completed: usize,
    /// Workers whose feed could not be opened.
    pub aborted: usize,
    /// Workers that panicked.
    pub panicked: usize,
    /// Items dropped as undecodable, summed over all sources.
    pub skipped: usize,
}

/// Runs every source concurrently into one output.
pub struct Pipeline {
    fetcher: Arc<dyn FeedFetcher>,
    settings: Arc<RunSettings>,
    now: Option<DateTime<Utc>>,
}

impl Pipeline {
    /// Creates a pipeline fetching through `fetcher`.
    pub fn new(fetcher: Arc<dyn FeedFetcher>, settings: RunSettings) -> Self {
        Self {
            fetcher,
            settings: Arc::new(settings),
            now: None,
        }
    }

    /// Pins the instant events are compared against. Defaults to the run's
    /// start time.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Runs one worker per source and writes their lines to `out`.
    ///
    /// Returns once every worker has finished and every line is written.
    /// Per-source failures are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if writing to `out` fails; remaining
    /// workers are cancelled.
    pub async fn run<W>(&self, sources: Vec<EventSource>, out: &mut W) -> ClientResult<RunSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let now = self.now.unwrap_or_else(Utc::now);
        let (sink, lines) = mpsc::channel(SINK_CAPACITY);

        let mut workers = JoinSet::new();
        for source in sources {
            debug!(source = %source.name, url = %source.url, "Starting worker");
            let worker = worker::Worker {
                source,
                fetcher: Arc::clone(&self.fetcher),
                settings: Arc::clone(&self.settings),
                now,
                sink: sink.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(sink);

        let written = merge::drain(lines, out).await?;

        let mut summary = RunSummary {
            written,
            ..RunSummary::default()
        };
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(WorkerOutcome::Done { skipped, .. }) => {
                    summary.completed += 1;
                    summary.skipped += skipped;
                }
                Ok(WorkerOutcome::Aborted) => summary.aborted += 1,
                Err(e) => {
                    error!(error = %e, "Worker panicked");
                    summary.panicked += 1;
                }
            }
        }

        info!(
            written = summary.written,
            completed = summary.completed,
            aborted = summary.aborted,
            "Run finished"
        );
        Ok(summary)
    }
}
