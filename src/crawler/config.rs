use std::sync::Arc;
use std::time::Duration;

use super::error::{CrawlError, CrawlResult};
use super::policy::normalize_domains;

/// Default timeout for a single page request in seconds
pub const LINK_REQUEST_TIMEOUT_SEC: u64 = 10;
/// Default delay between two requests to the same host in milliseconds
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; SimpleWebCrawler/1.0)";

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Deepest link hop that is still fetched, the seed is depth 0
    pub max_depth: usize,
    /// Upper bound on claimed (dispatched) URLs
    pub max_pages: usize,
    /// Minimum gap between fetch starts on the same host
    pub request_delay: Duration,
    /// Hostname suffixes in scope, empty means unrestricted
    pub allowed_domains: Vec<String>,
    /// Number of worker tasks
    pub max_concurrency: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Extra attempts after a transport failure
    pub max_retries: usize,
    /// Record 4xx/5xx responses as failures instead of pages
    pub http_errors_as_failures: bool,
    /// Deadline for the whole crawl
    pub crawl_timeout: Option<Duration>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            allowed_domains: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: Duration::from_secs(LINK_REQUEST_TIMEOUT_SEC),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 0,
            http_errors_as_failures: false,
            crawl_timeout: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_request_delay(mut self, delay_ms: u64) -> Self {
        self.request_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_domains = normalize_domains(domains);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_http_errors_as_failures(mut self, enabled: bool) -> Self {
        self.http_errors_as_failures = enabled;
        self
    }

    pub fn with_crawl_timeout(mut self, timeout: Duration) -> Self {
        self.crawl_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> CrawlResult<()> {
        if self.max_pages == 0 {
            return Err(CrawlError::Config("max_pages must be greater than 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config("max_concurrency must be greater than 0".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(CrawlError::Config("request_timeout must be greater than 0".into()));
        }
        Ok(())
    }
}

pub type CrawlerConfigRef = Arc<CrawlerConfig>;
