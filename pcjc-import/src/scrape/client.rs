//! HTTP page fetcher
//!
//! One outbound request every two seconds, as a politeness policy toward
//! the hobbyist server the archive lives on. Failures are reported, never
//! retried automatically - a failed fetch is re-run by hand.

use std::time::Duration;

use thiserror::Error;

/// Minimum interval between outbound requests
const REQUEST_INTERVAL: Duration = Duration::from_secs(2);

/// Page retrieval errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Cannot write a fetched file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cannot serialize the extracted record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] pcjc_common::Error),
}

/// Capability seam for page retrieval, so tests can substitute canned
/// pages for the network.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Rate-limited reqwest fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        // Safe: the interval is non-zero
        let quota = governor::Quota::with_period(REQUEST_INTERVAL)
            .expect("non-zero request interval");
        let rate_limiter = governor::RateLimiter::direct(quota);

        Self {
            client: reqwest::Client::builder()
                .user_agent("pcjc-import/0.1 (hobbyist award archive)")
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client (system error)"),
            rate_limiter,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.rate_limiter.until_ready().await;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        Ok(self.get(url).await?.text().await?)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}
