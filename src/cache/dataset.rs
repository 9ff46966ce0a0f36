//! TTL-based dataset cache with stale fallback

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::data::{CarbonRecord, DatasetSource, FetchError};

/// How long a fetched dataset is considered fresh, in hours
pub const CACHE_TTL_HOURS: i64 = 1;

/// A successfully fetched dataset together with its fetch time
#[derive(Debug, Clone)]
pub struct CachedDataset {
    /// Records in upstream order
    pub records: Vec<CarbonRecord>,
    /// When this copy was fetched
    pub fetched_at: DateTime<Utc>,
}

/// In-memory cache over a [`DatasetSource`]
///
/// Owned by the service instance and shared across request handlers.
/// The cached dataset is only ever replaced by a newer successful fetch,
/// never cleared, so after the first success the service keeps answering
/// even when the upstream goes away.
///
/// Concurrent requests that both observe an expired cache may each trigger
/// a fetch; the redundant fetch is harmless and cheaper than single-flight
/// coordination for a dataset this small.
pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    ttl: Duration,
    state: RwLock<Option<CachedDataset>>,
}

impl DatasetCache {
    /// Creates a cache over the given source with the default one-hour TTL
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self::with_ttl(source, Duration::hours(CACHE_TTL_HOURS))
    }

    /// Creates a cache with a custom TTL
    ///
    /// Used by tests that need immediate expiry.
    pub fn with_ttl(source: Arc<dyn DatasetSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: RwLock::new(None),
        }
    }

    /// Returns the current dataset, refreshing it when absent or expired
    ///
    /// # Returns
    /// * `Ok(CachedDataset)` - fresh data, newly fetched data, or stale data
    ///   when the refresh failed but an older copy exists
    /// * `Err(FetchError)` - only when no dataset has ever been cached and
    ///   the fetch failed
    pub async fn current(&self) -> Result<CachedDataset, FetchError> {
        {
            let state = self.state.read().await;
            if let Some(cached) = state.as_ref() {
                if Utc::now() - cached.fetched_at <= self.ttl {
                    return Ok(cached.clone());
                }
            }
        }

        // Absent or expired: attempt a refresh. The lock is not held across
        // the network call, so overlapping requests may fetch redundantly.
        match self.source.fetch_dataset().await {
            Ok(records) => {
                let cached = CachedDataset {
                    records,
                    fetched_at: Utc::now(),
                };
                let mut state = self.state.write().await;
                *state = Some(cached.clone());
                info!(records = cached.records.len(), "dataset refreshed");
                Ok(cached)
            }
            Err(err) => {
                let state = self.state.read().await;
                match state.as_ref() {
                    Some(cached) => {
                        warn!(error = %err, "refresh failed, serving stale dataset");
                        Ok(cached.clone())
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Returns when the cached dataset was fetched, without triggering a refresh
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.as_ref().map(|c| c.fetched_at)
    }
}
