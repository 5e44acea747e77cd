pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod pacing;
pub mod policy;
pub mod runner;
pub mod scrape;
pub mod state;
pub mod visited;


pub use collector::{CrawlStats, PageResult, ResultCollector};
pub use config::{CrawlerConfig, CrawlerConfigRef, LINK_REQUEST_TIMEOUT_SEC};
pub use error::{CrawlError, CrawlResult};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Dispatch, Frontier, WorkItem};
pub use pacing::HostPacer;
pub use policy::is_allowed;
pub use runner::{Crawler, crawl};
pub use scrape::{ExtractedPage, HtmlLinkExtractor, LinkExtractor, NO_TITLE, normalize_url, parse_seed};
pub use state::{CrawlReport, CrawlerState, CrawlerStateRef};
pub use visited::{Claim, VisitedRegistry};
