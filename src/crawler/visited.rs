use std::collections::HashSet;
use tokio::sync::Mutex;
use url::Url;

/// Outcome of trying to claim a URL against the page budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    AlreadyClaimed,
    BudgetExhausted,
}

/// Set of URLs already claimed for fetching.
///
/// A URL is claimed once, when it is handed to a worker, whether or not the
/// fetch later succeeds.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<Url>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true for exactly one caller per URL.
    ///
    /// Ignores the page budget. The frontier claims through `claim_within`.
    pub async fn try_claim(&self, url: &Url) -> bool {
        let mut claimed = self.claimed.lock().await;
        claimed.insert(url.clone())
    }

    /// Claims `url` unless it is already claimed or `limit` URLs have been
    /// claimed. Both checks and the insert happen under the same lock.
    pub async fn claim_within(&self, url: &Url, limit: usize) -> Claim {
        let mut claimed = self.claimed.lock().await;
        if claimed.contains(url) {
            return Claim::AlreadyClaimed;
        }
        if claimed.len() >= limit {
            return Claim::BudgetExhausted;
        }
        claimed.insert(url.clone());
        Claim::Claimed
    }

    pub async fn contains(&self, url: &Url) -> bool {
        self.claimed.lock().await.contains(url)
    }

    pub async fn len(&self) -> usize {
        self.claimed.lock().await.len()
    }
}
