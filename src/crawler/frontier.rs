use log2::{debug, info, trace};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use super::config::CrawlerConfigRef;
use super::pacing::{HostPacer, host_key};
use super::policy::is_allowed;
use super::visited::{Claim, VisitedRegistry};

/// A URL waiting to be fetched together with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: Url,
    pub depth: usize,
}

impl WorkItem {
    pub fn new(url: Url, depth: usize) -> Self {
        Self { url, depth }
    }
}

/// What a worker should do next
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Claimed and due, fetch it now
    Ready(WorkItem),
    /// Only held items are left; the earliest becomes due at this instant
    WaitUntil(Instant),
    /// Nothing to take, but fetches in flight may still produce links
    Idle,
    /// No queued, held or in-flight work remains
    Finished,
}

struct FrontierInner {
    pending: VecDeque<WorkItem>,
    /// Claimed items whose host was not due yet
    held: VecDeque<WorkItem>,
    pacer: HostPacer,
    in_flight: usize,
    budget_spent: bool,
}

/// Work queue shared by all workers.
///
/// Taking an item and marking it in flight, and enqueueing a finished item's
/// links and marking it done, each happen under one lock, so a worker never
/// sees an empty frontier while another is about to add to it.
pub struct Frontier {
    config: CrawlerConfigRef,
    visited: Arc<VisitedRegistry>,
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    pub fn new(config: CrawlerConfigRef, visited: Arc<VisitedRegistry>, seed: Url) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(WorkItem::new(seed, 0));

        let inner = FrontierInner {
            pending,
            held: VecDeque::new(),
            pacer: HostPacer::new(config.request_delay),
            in_flight: 0,
            budget_spent: false,
        };

        Self {
            config,
            visited,
            inner: Mutex::new(inner),
        }
    }

    /// Picks the next item to fetch, claiming it in the visited registry.
    pub async fn next_dispatch(&self) -> Dispatch {
        let mut guard = self.inner.lock().await;
        let FrontierInner {
            pending,
            held,
            pacer,
            in_flight,
            budget_spent,
        } = &mut *guard;
        let now = Instant::now();

        // held items are already claimed, they go first once due
        if let Some(pos) = held
            .iter()
            .position(|item| pacer.ready_at(&host_key(&item.url), now).is_none())
        {
            if let Some(item) = held.remove(pos) {
                pacer.mark_started(&host_key(&item.url), now);
                *in_flight += 1;
                return Dispatch::Ready(item);
            }
        }

        while let Some(item) = pending.pop_front() {
            if item.depth > self.config.max_depth {
                trace!("Skipping {}: depth {} over limit", item.url, item.depth);
                continue;
            }
            if !is_allowed(&item.url, &self.config.allowed_domains) {
                debug!("Skipping {}: host not in allowed domains", item.url);
                continue;
            }

            match self.visited.claim_within(&item.url, self.config.max_pages).await {
                Claim::AlreadyClaimed => continue,
                Claim::BudgetExhausted => {
                    info!(
                        "Page budget of {} reached, discarding {} queued items",
                        self.config.max_pages,
                        pending.len() + 1
                    );
                    pending.clear();
                    *budget_spent = true;
                    break;
                }
                Claim::Claimed => {}
            }

            let host = host_key(&item.url);
            if pacer.ready_at(&host, now).is_none() {
                pacer.mark_started(&host, now);
                *in_flight += 1;
                return Dispatch::Ready(item);
            }
            trace!("Holding {} until {} is due", item.url, host);
            held.push_back(item);
        }

        if let Some(due) = held
            .iter()
            .filter_map(|item| pacer.ready_at(&host_key(&item.url), now))
            .min()
        {
            return Dispatch::WaitUntil(due);
        }

        if *in_flight > 0 {
            Dispatch::Idle
        } else {
            Dispatch::Finished
        }
    }

    /// Marks a dispatched item done and queues the links found on it.
    pub async fn complete(&self, item: &WorkItem, links: &[Url]) {
        let mut inner = self.inner.lock().await;
        let child_depth = item.depth + 1;

        if !inner.budget_spent && child_depth <= self.config.max_depth {
            for link in links {
                if !self.visited.contains(link).await {
                    inner.pending.push_back(WorkItem::new(link.clone(), child_depth));
                }
            }
        }

        inner.in_flight = inner.in_flight.saturating_sub(1);
    }

    pub async fn queued(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.pending.len() + inner.held.len()
    }
}
