use std::sync::Arc;
use tokio::sync::Notify;
use url::Url;

use super::collector::{CrawlStats, PageResult, ResultCollector};
use super::config::CrawlerConfigRef;
use super::frontier::Frontier;
use super::visited::VisitedRegistry;

/// Current state of one crawl, shared by all workers
pub struct CrawlerState {
    /// Queued, held and in-flight work
    pub frontier: Frontier,
    /// URLs claimed for fetching
    pub visited: Arc<VisitedRegistry>,
    /// Page results in completion order
    pub results: ResultCollector,
    /// Wakes idle workers when an item completes
    pub wake: Notify,
}

impl CrawlerState {
    pub fn new(seed: Url, config: CrawlerConfigRef) -> Self {
        let visited = Arc::new(VisitedRegistry::new());
        Self {
            frontier: Frontier::new(config, Arc::clone(&visited), seed),
            visited,
            results: ResultCollector::new(),
            wake: Notify::new(),
        }
    }

    pub async fn stats(&self) -> CrawlStats {
        self.results.stats(self.visited.len().await).await
    }
}

pub type CrawlerStateRef = Arc<CrawlerState>;

/// What a finished (or cancelled) crawl hands back
#[derive(Debug, Clone, serde::Serialize)]
pub struct CrawlReport {
    pub results: Vec<PageResult>,
    pub stats: CrawlStats,
    /// The crawl was stopped before its frontier ran dry
    pub cancelled: bool,
}
