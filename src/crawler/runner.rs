use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log2::*;
use tokio::task::JoinSet;
use tokio::time::sleep_until;
use tokio_util::sync::CancellationToken;

use super::collector::PageResult;
use super::config::{CrawlerConfig, CrawlerConfigRef};
use super::error::{CrawlError, CrawlResult};
use super::fetch::{Fetcher, HttpFetcher};
use super::frontier::{Dispatch, WorkItem};
use super::scrape::{ExtractedPage, HtmlLinkExtractor, LinkExtractor, parse_seed};
use super::state::{CrawlReport, CrawlerState, CrawlerStateRef};

/// Crawls from a seed with the default HTTP fetcher and HTML extractor.
pub async fn crawl(seed: &str, config: CrawlerConfig) -> CrawlResult<CrawlReport> {
    Crawler::new(config)?.crawl(seed).await
}

/// Frontier scheduler plus the collaborators it fetches and parses with
pub struct Crawler {
    config: CrawlerConfigRef,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> CrawlResult<Self> {
        config.validate()?;
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        let extractor = Arc::new(HtmlLinkExtractor::new()?);
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            extractor,
        })
    }

    pub fn with_collaborators(
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> CrawlResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            extractor,
        })
    }

    pub async fn crawl(&self, seed: &str) -> CrawlResult<CrawlReport> {
        self.crawl_with_cancel(seed, CancellationToken::new()).await
    }

    /// Crawls until the frontier runs dry or `cancel` fires.
    ///
    /// On cancellation no new fetches start, fetches already in flight finish
    /// and everything collected so far is returned with `cancelled` set.
    pub async fn crawl_with_cancel(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> CrawlResult<CrawlReport> {
        let seed = parse_seed(seed)?;
        info!(
            "Starting crawl from: {} (max depth {}, max pages {}, {} workers)",
            seed, self.config.max_depth, self.config.max_pages, self.config.max_concurrency
        );

        // child token so the crawl deadline never cancels the caller's token
        let cancel = cancel.child_token();
        let deadline = self.config.crawl_timeout.map(|timeout| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                info!("Crawl timeout of {:?} reached, stopping", timeout);
                cancel.cancel();
            })
        });

        let state = Arc::new(CrawlerState::new(seed, Arc::clone(&self.config)));
        let outcome = self.run_workers(Arc::clone(&state), cancel).await;
        if let Some(deadline) = deadline {
            deadline.abort();
        }
        let cancelled = outcome?;

        let stats = state.stats().await;
        info!(
            "Crawl finished: {} pages, {} failures, {} unique URLs, max depth {}",
            stats.total_pages, stats.failed_pages, stats.unique_urls, stats.max_depth_reached
        );

        Ok(CrawlReport {
            results: state.results.results().await,
            stats,
            cancelled,
        })
    }

    /// Returns whether any worker stopped because of cancellation.
    ///
    /// A worker that panics leaves its item in flight forever, so the first
    /// failed worker cancels the rest and the crawl ends with `Worker`.
    async fn run_workers(&self, state: CrawlerStateRef, cancel: CancellationToken) -> CrawlResult<bool> {
        let stopped_early = Arc::new(AtomicBool::new(false));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.config.max_concurrency {
            let worker = Worker {
                id: worker_id,
                state: Arc::clone(&state),
                config: Arc::clone(&self.config),
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                cancel: cancel.clone(),
                stopped_early: Arc::clone(&stopped_early),
            };
            workers.spawn(worker.run());
        }

        let mut failed = None;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                if failed.is_none() {
                    error!("Crawler worker failed, stopping crawl: {}", e);
                    cancel.cancel();
                    failed = Some(e);
                }
            }
        }

        match failed {
            Some(e) => Err(CrawlError::Worker(e)),
            None => Ok(stopped_early.load(Ordering::SeqCst)),
        }
    }
}

struct Worker {
    id: usize,
    state: CrawlerStateRef,
    config: CrawlerConfigRef,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    cancel: CancellationToken,
    stopped_early: Arc<AtomicBool>,
}

impl Worker {
    async fn run(self) {
        debug!("Worker {} started", self.id);

        loop {
            if self.cancel.is_cancelled() {
                info!("Worker {}: crawl cancelled. Exiting...", self.id);
                self.stopped_early.store(true, Ordering::SeqCst);
                break;
            }

            // registered before looking at the frontier so a completion in
            // between is not missed
            let wake = self.state.wake.notified();
            tokio::pin!(wake);
            wake.as_mut().enable();

            match self.state.frontier.next_dispatch().await {
                Dispatch::Ready(item) => {
                    info!("Worker {}: Crawling {} at depth {}", self.id, item.url, item.depth);
                    let result = self.process(&item).await;
                    let links = result.links().to_vec();
                    self.state.results.record(result).await;
                    self.state.frontier.complete(&item, &links).await;
                    self.state.wake.notify_waiters();
                }
                Dispatch::WaitUntil(due) => {
                    tokio::select! {
                        _ = sleep_until(due) => {}
                        _ = &mut wake => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
                Dispatch::Idle => {
                    tokio::select! {
                        _ = &mut wake => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
                Dispatch::Finished => {
                    debug!("Worker {}: frontier empty and nothing in flight. Shutting down.", self.id);
                    self.state.wake.notify_waiters();
                    break;
                }
            }
        }

        debug!("Worker {} finished", self.id);
    }

    /// Fetches and parses one item. Never fails: errors become failure results.
    async fn process(&self, item: &WorkItem) -> PageResult {
        let page = match self.fetcher.fetch(&item.url, self.config.request_timeout).await {
            Ok(page) => page,
            Err(e) => return self.failure(item, e),
        };

        if self.config.http_errors_as_failures && page.status_code >= 400 {
            return self.failure(item, CrawlError::HttpStatus(page.status_code));
        }

        let extracted = self
            .extractor
            .extract(&page.body, &page.final_url)
            .unwrap_or_else(|e| {
                warn!("Worker {}: {} on {}, keeping page without links", self.id, e, item.url);
                ExtractedPage::untitled()
            });

        info!("Found {} links on: {}", extracted.links.len(), item.url);

        PageResult::Page {
            url: item.url.clone(),
            final_url: page.final_url,
            title: extracted.title,
            links: extracted.links,
            depth: item.depth,
            status_code: page.status_code,
        }
    }

    fn failure(&self, item: &WorkItem, error: CrawlError) -> PageResult {
        warn!("Worker {}: Error crawling {}: {}", self.id, item.url, error);
        PageResult::Failure {
            url: item.url.clone(),
            depth: item.depth,
            error: error.to_string(),
        }
    }
}
