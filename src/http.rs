//! Downloading feeds and article pages.
//!
//! Everything that touches the network for feeds and pages goes through
//! [`FetchText`], so the collector and fetcher can be driven by in-memory
//! pages in tests.

use reqwest::Client;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Browser-like agent; several Korean outlets reject unknown clients.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Retrieves the body behind a URL.
pub trait FetchText {
    /// Fetch `url` and return its decoded body.
    ///
    /// Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>>;

    /// Fetch `url` and return the raw body, undecoded.
    ///
    /// Feeds go through this so the parser can honour the XML `encoding=`
    /// declaration instead of the HTTP charset header.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn Error>>;
}

/// [`FetchText`] over a shared `reqwest` client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchText for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Downloaded"
        );
        Ok(body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?.to_vec();
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Downloaded"
        );
        Ok(body)
    }
}
