use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::crawler::CrawlerConfig;
use crate::crawler::config::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_REQUEST_DELAY_MS,
    DEFAULT_USER_AGENT, LINK_REQUEST_TIMEOUT_SEC,
};

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// This struct is supposed to receive all program arguments while CrawlerConfig
/// describes only the crawler
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Depth and page bounded web crawler", long_about = None)]
pub struct Config {
    /// URL to start crawling from
    pub seed_url: String,
    /// Maximum link depth from the seed
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,
    /// Delay between requests to the same host in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    pub delay: u64,
    /// Only crawl these domains and their subdomains (repeatable)
    #[arg(short, long = "allowed-domain", value_delimiter = ',')]
    pub allowed_domains: Vec<String>,
    /// Number of concurrent fetches
    #[arg(short = 'c', long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = LINK_REQUEST_TIMEOUT_SEC)]
    pub timeout: u64,
    /// User agent sent with every request
    #[arg(short, long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Retries after a transport failure
    #[arg(long, default_value_t = 0)]
    pub max_retries: usize,
    /// Record 4xx/5xx responses as failures
    #[arg(long)]
    pub http_errors_as_failures: bool,
    /// Stop the whole crawl after this many seconds
    #[arg(long)]
    pub crawl_timeout: Option<u64>,
    /// Write results and stats as JSON to this file
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.crawler_config()
            .validate()
            .context("Invalid crawler arguments")?;
        Ok(())
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        let config = CrawlerConfig::new()
            .with_max_depth(self.max_depth)
            .with_max_pages(self.max_pages)
            .with_request_delay(self.delay)
            .with_allowed_domains(&self.allowed_domains)
            .with_max_concurrency(self.max_concurrency)
            .with_request_timeout(Duration::from_secs(self.timeout))
            .with_user_agent(self.user_agent.clone())
            .with_max_retries(self.max_retries)
            .with_http_errors_as_failures(self.http_errors_as_failures);

        match self.crawl_timeout {
            Some(secs) => config.with_crawl_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlError;

    #[test]
    fn defaults_follow_crawler_defaults() {
        let cfg = Config::try_parse_from(["web_crawler", "https://example.com"]).unwrap();
        assert!(cfg.validate().is_ok());
        let crawler = cfg.crawler_config();
        assert_eq!(crawler.max_depth, 2);
        assert_eq!(crawler.max_pages, 50);
        assert_eq!(crawler.request_delay, Duration::from_millis(1000));
        assert_eq!(crawler.max_concurrency, 4);
        assert!(crawler.crawl_timeout.is_none());
    }

    #[test]
    fn allowed_domains_accept_lists_and_repeats() {
        let cfg = Config::try_parse_from([
            "web_crawler",
            "https://example.com",
            "--allowed-domain",
            "Example.com,docs.rs",
            "-a",
            "rust-lang.org",
            "--crawl-timeout",
            "30",
        ])
        .unwrap();
        let crawler = cfg.crawler_config();
        assert_eq!(crawler.allowed_domains, vec!["example.com", "docs.rs", "rust-lang.org"]);
        assert_eq!(crawler.crawl_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_pages_fails_validation() {
        let cfg = Config::try_parse_from(["web_crawler", "https://example.com", "--max-pages", "0"]).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_timeout_and_workers_fail_like_the_library() {
        for flag in ["--timeout", "--max-concurrency"] {
            let cfg = Config::try_parse_from(["web_crawler", "https://example.com", flag, "0"]).unwrap();
            let err = cfg.validate().unwrap_err();
            assert!(
                matches!(err.downcast_ref::<CrawlError>(), Some(CrawlError::Config(_))),
                "{} 0 gave {:?}",
                flag,
                err
            );
        }
    }
}
