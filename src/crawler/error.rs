use thiserror::Error;

/// Errors produced while crawling
///
/// Only `InvalidSeed`, `UnsupportedScheme`, `Config`, `Client` and `Worker` ever
/// reach the caller of a crawl. The rest are per-page and end up inside a
/// failure result.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme '{0}', only http and https can be crawled")]
    UnsupportedScheme(String),

    #[error("Invalid crawler configuration: {0}")]
    Config(String),

    /// DNS, connect or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Only produced when the crawler treats 4xx/5xx as failures
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Crawler worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type CrawlResult<T> = Result<T, CrawlError>;
