use async_trait::async_trait;
use log2::{debug, warn};
use reqwest::{Client, redirect};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use super::config::CrawlerConfig;
use super::error::{CrawlError, CrawlResult};

const MAX_REDIRECTS: usize = 10;
const RETRY_BACKOFF_MS: u64 = 250;

/// Response of a single GET
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status_code: u16,
    /// URL after following redirects
    pub final_url: Url,
    /// Body re-encoded as UTF-8
    pub body: Vec<u8>,
}

/// Issues one GET for a URL.
///
/// Non-2xx responses are returned as pages, only transport problems and
/// timeouts are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> CrawlResult<FetchedPage>;
}

/// `Fetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: usize,
    /// Retries hit the same host, so they wait at least this long too
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> CrawlResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            request_delay: config.request_delay,
        })
    }

    async fn fetch_once(&self, url: &Url, timeout: Duration) -> CrawlResult<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();
        // decoded with the charset from Content-Type, UTF-8 if none is given
        let body = response.text().await.map_err(|e| classify(e, timeout))?;

        Ok(FetchedPage {
            status_code,
            final_url,
            body: body.into_bytes(),
        })
    }

    /// Linear backoff, never shorter than the per-host delay.
    fn retry_wait(&self, attempt: usize) -> Duration {
        Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64).max(self.request_delay)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> CrawlResult<FetchedPage> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url, timeout).await {
                Err(CrawlError::Transport(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Retrying {} ({}/{}): {}", url, attempt, self.max_retries, reason);
                    sleep(self.retry_wait(attempt)).await;
                }
                other => {
                    if let Ok(page) = &other {
                        if page.final_url != *url {
                            debug!("{} redirected to {}", url, page.final_url);
                        }
                    }
                    return other;
                }
            }
        }
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> CrawlError {
    if error.is_timeout() {
        CrawlError::Timeout(timeout)
    } else {
        CrawlError::Transport(error.to_string())
    }
}
