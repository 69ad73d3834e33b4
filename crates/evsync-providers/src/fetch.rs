//! Feed transport.
//!
//! [`FeedFetcher`] is the seam between the pipeline and the network: given a
//! URL it hands back the response body as a stream of chunks. [`HttpFetcher`]
//! implements it on top of reqwest.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep [`FeedFetcher`] object-safe so the pipeline can share
/// one `Arc<dyn FeedFetcher>` between workers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A feed body, chunk by chunk.
pub type ByteStream = BoxStream<'static, ProviderResult<Vec<u8>>>;

/// Retrieves the raw bytes of a calendar feed.
pub trait FeedFetcher: Send + Sync {
    /// Opens the feed at `url`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on connection failures and non-success
    /// statuses. Errors while reading the body surface through the stream.
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, ProviderResult<ByteStream>>;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl HttpFetcherConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("evsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP implementation of [`FeedFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given configuration.
    pub fn new(config: HttpFetcherConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> ProviderResult<ByteStream> {
        trace!(url = %url, "Sending request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("Request failed: {}", e)).with_source(e))?;

        let response = check_status(response).await?;
        debug!(url = %url, "Feed opened");

        Ok(response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| ProviderError::network(format!("Failed to read response: {}", e)))
            })
            .boxed())
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, ProviderResult<ByteStream>> {
        Box::pin(async move {
            self.get(url)
                .await
                .map_err(|e| e.with_url(url.as_str()))
        })
    }
}

/// Maps non-success statuses to errors.
async fn check_status(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    trace!(status = %status, "Received response");

    match status {
        s if s.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ProviderError::not_found("Feed not found")),
        StatusCode::TOO_MANY_REQUESTS => {
            Err(ProviderError::rate_limited("Too many requests to server"))
        }
        s if s.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::server(format!("Server error ({}): {}", s, body)))
        }
        s => Err(ProviderError::invalid_response(format!(
            "Unexpected status {}",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use futures_util::TryStreamExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(HttpFetcherConfig::new().with_timeout(Duration::from_secs(5)))
            .expect("http fetcher")
    }

    async fn collect(stream: ByteStream) -> Vec<u8> {
        stream
            .try_concat()
            .await
            .expect("body")
    }

    #[test]
    fn config_builder_methods() {
        let config = HttpFetcherConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent");
        assert!(HttpFetcherConfig::default().user_agent.starts_with("evsync/"));
    }

    #[tokio::test]
    async fn streams_successful_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/f1.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("BEGIN:VCALENDAR\r\n"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/f1.ics", server.uri())).unwrap();
        let stream = fetcher().fetch(&url).await.expect("stream");
        assert_eq!(collect(stream).await, b"BEGIN:VCALENDAR\r\n");
    }

    #[tokio::test]
    async fn sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "evsync-test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher =
            HttpFetcher::new(HttpFetcherConfig::new().with_user_agent("evsync-test")).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        assert!(fetcher.fetch(&url).await.is_ok());
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let err = fetcher().fetch(&url).await.err().expect("error");
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.url(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let err = fetcher().fetch(&url).await.err().expect("error");
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
        assert!(err.message().contains("maintenance"));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/feed.ics", addr)).unwrap();
        let err = fetcher().fetch(&url).await.err().expect("error");
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
    }
}
