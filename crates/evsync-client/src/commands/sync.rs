//! The default command: run every source and print the records.

use std::sync::Arc;

use tokio::io::AsyncWrite;
use tracing::debug;

use evsync_providers::{FeedFetcher, HttpFetcher, HttpFetcherConfig};

use crate::config::{Config, ResolvedConfig};
use crate::error::ClientResult;
use crate::pipeline::{Pipeline, RunSummary};

/// Runs the pipeline over HTTP and writes records to stdout.
pub async fn run(config: &Config) -> ClientResult<RunSummary> {
    let resolved = config.resolve()?;
    let fetcher = HttpFetcher::new(HttpFetcherConfig::new().with_timeout(resolved.timeout))?;
    let mut stdout = tokio::io::stdout();
    execute(resolved, Arc::new(fetcher), &mut stdout).await
}

/// Runs the pipeline with a given fetcher and output.
///
/// The configuration is resolved before anything is fetched: an invalid
/// configuration fails without a single request.
pub async fn run_with<W>(
    config: &Config,
    fetcher: Arc<dyn FeedFetcher>,
    out: &mut W,
) -> ClientResult<RunSummary>
where
    W: AsyncWrite + Unpin,
{
    execute(config.resolve()?, fetcher, out).await
}

async fn execute<W>(
    resolved: ResolvedConfig,
    fetcher: Arc<dyn FeedFetcher>,
    out: &mut W,
) -> ClientResult<RunSummary>
where
    W: AsyncWrite + Unpin,
{
    debug!(sources = resolved.sources.len(), tz = %resolved.settings.tz, "Configuration resolved");

    Pipeline::new(fetcher, resolved.settings)
        .run(resolved.sources, out)
        .await
}
