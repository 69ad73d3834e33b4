//! In-memory feeds for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::StreamExt;
use url::Url;

use evsync_providers::{BoxFuture, ByteStream, FeedFetcher, ProviderError, ProviderResult};

struct Feed {
    chunks: Vec<String>,
    interrupted: bool,
}

/// Serves canned bodies by URL; unknown URLs answer "not found".
#[derive(Default)]
pub(crate) struct FakeFetcher {
    feeds: HashMap<String, Feed>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_feed(mut self, url: &str, chunks: &[impl AsRef<str>]) -> Self {
        self.feeds.insert(url.to_string(), Feed {
            chunks: chunks.iter().map(|c| c.as_ref().to_string()).collect(),
            interrupted: false,
        });
        self
    }

    /// A feed whose body breaks off after `chunks`.
    pub(crate) fn with_interrupted_feed(mut self, url: &str, chunks: &[impl AsRef<str>]) -> Self {
        self.feeds.insert(url.to_string(), Feed {
            chunks: chunks.iter().map(|c| c.as_ref().to_string()).collect(),
            interrupted: true,
        });
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeedFetcher for FakeFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, ProviderResult<ByteStream>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let feed = self
                .feeds
                .get(url.as_str())
                .ok_or_else(|| ProviderError::not_found("Feed not found").with_url(url.as_str()))?;

            let mut items: Vec<ProviderResult<Vec<u8>>> = feed
                .chunks
                .iter()
                .map(|c| Ok(c.clone().into_bytes()))
                .collect();
            if feed.interrupted {
                items.push(Err(ProviderError::network("connection reset")));
            }
            Ok(futures_util::stream::iter(items).boxed())
        })
    }
}

/// Builds a feed with one VEVENT per `(DTSTART value, SUMMARY)` pair.
pub(crate) fn ics(events: &[(&str, &str)]) -> String {
    let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n");
    for (i, (start, summary)) in events.iter().enumerate() {
        body.push_str(&format!(
            "BEGIN:VEVENT\r\nUID:{i}@test\r\nDTSTAMP:20240101T000000Z\r\nDTSTART:{start}\r\nSUMMARY:{summary}\r\nEND:VEVENT\r\n"
        ));
    }
    body.push_str("END:VCALENDAR\r\n");
    body
}
