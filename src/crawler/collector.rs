use serde::Serialize;
use tokio::sync::Mutex;
use url::Url;

/// Outcome of crawling one claimed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageResult {
    /// A response arrived, whatever its status code
    Page {
        url: Url,
        final_url: Url,
        title: String,
        links: Vec<Url>,
        depth: usize,
        status_code: u16,
    },
    Failure {
        url: Url,
        depth: usize,
        error: String,
    },
}

impl PageResult {
    pub fn url(&self) -> &Url {
        match self {
            PageResult::Page { url, .. } | PageResult::Failure { url, .. } => url,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            PageResult::Page { depth, .. } | PageResult::Failure { depth, .. } => *depth,
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, PageResult::Page { .. })
    }

    pub fn links(&self) -> &[Url] {
        match self {
            PageResult::Page { links, .. } => links,
            PageResult::Failure { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub total_pages: usize,
    pub failed_pages: usize,
    pub unique_urls: usize,
    pub max_depth_reached: usize,
}

impl CrawlStats {
    pub fn from_results(results: &[PageResult], unique_urls: usize) -> Self {
        let mut stats = CrawlStats {
            unique_urls,
            ..Default::default()
        };
        for result in results {
            if result.is_page() {
                stats.total_pages += 1;
            } else {
                stats.failed_pages += 1;
            }
            stats.max_depth_reached = stats.max_depth_reached.max(result.depth());
        }
        stats
    }
}

/// Results in completion order, appended to by all workers
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: Mutex<Vec<PageResult>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, result: PageResult) {
        self.results.lock().await.push(result);
    }

    pub async fn len(&self) -> usize {
        self.results.lock().await.len()
    }

    pub async fn results(&self) -> Vec<PageResult> {
        self.results.lock().await.clone()
    }

    pub async fn stats(&self, unique_urls: usize) -> CrawlStats {
        CrawlStats::from_results(&self.results.lock().await, unique_urls)
    }
}
