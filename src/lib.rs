pub mod config;
pub mod crawler;

pub use crawler::{
    CrawlError, CrawlReport, CrawlStats, Crawler, CrawlerConfig, PageResult, crawl,
};
pub use tokio_util::sync::CancellationToken;
