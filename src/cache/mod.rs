//! Query cache.
//!
//! Fetched values are cached per [`QueryKey`] for the staleness window.
//! Concurrent reads of a missing key share one fetch. Transient fetch
//! failures are retried with backoff; other failures surface at once.
//!
//! Invalidating a key while its fetch is running marks the result stale, and
//! the fetch starts over instead of caching it. A `set` during a fetch wins
//! over the fetched value.

pub mod keys;

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use moka::future::Cache;
use stockroom_client::ClientError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use keys::QueryKey;

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::utils::retry::{is_retryable, query_backoff};

/// How many times a fetch restarts after its result was invalidated in
/// flight. The last result is returned even if it was invalidated again.
const STALE_REFETCHES: usize = 2;

struct Slot {
    value: Box<dyn Any + Send + Sync>,
    /// Invalidated while its fetch was running. Never served from `get`.
    stale: bool,
}

type Entry = Arc<Slot>;

impl Slot {
    fn new<T: Send + Sync + 'static>(value: T, stale: bool) -> Entry {
        Arc::new(Self {
            value: Box::new(value),
            stale,
        })
    }
}

/// What happened to a key while its fetch was running.
enum InFlight {
    Clean,
    Invalidated,
    Replaced(Entry),
}

/// Shared query cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, Entry>,
    inflight: Arc<Mutex<HashMap<QueryKey, InFlight>>>,
    backoff: ExponentialBuilder,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.stale_time())
                .build(),
            inflight: Arc::default(),
            backoff: query_backoff(config),
        }
    }

    /// Cached value for `key`, or the result of `fetcher`.
    ///
    /// `fetcher` may run several times when it fails with a retryable error,
    /// or when `key` is invalidated while it runs. Failures are not cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, mut fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = stockroom_client::Result<T>>,
    {
        let mut refetches = 0;
        loop {
            let entry = self.load(&key, &mut fetcher).await?;
            if entry.stale && refetches < STALE_REFETCHES {
                refetches += 1;
                debug!(key = %key, "Query invalidated while fetching, refetching");
                self.evict(&key, &entry).await;
                continue;
            }
            return downcast(&key, &entry);
        }
    }

    async fn load<T, F, Fut>(&self, key: &QueryKey, fetcher: &mut F) -> Result<Entry>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = stockroom_client::Result<T>>,
    {
        let backoff = self.backoff;
        let init = async {
            debug!(key = %key, "Fetching query");
            self.inflight.lock().await.insert(key.clone(), InFlight::Clean);
            let result = fetcher
                .retry(backoff)
                .when(is_retryable)
                .notify(|err: &ClientError, delay| {
                    warn!(key = %key, error = %err, ?delay, "Query failed, retrying");
                })
                .await;
            let state = self.inflight.lock().await.remove(key);
            let value = result?;

            Ok::<Entry, ClientError>(match state {
                Some(InFlight::Replaced(entry)) => entry,
                Some(InFlight::Invalidated) => Slot::new(value, true),
                Some(InFlight::Clean) | None => Slot::new(value, false),
            })
        };

        self.inner
            .try_get_with(key.clone(), init)
            .await
            .map_err(Error::Fetch)
    }

    /// Drop `entry` unless something newer has replaced it.
    async fn evict(&self, key: &QueryKey, entry: &Entry) {
        if let Some(current) = self.inner.get(key).await {
            if Arc::ptr_eq(&current, entry) {
                self.inner.invalidate(key).await;
            }
        }
    }

    /// Cached value for `key` if fresh.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.inner.get(key).await.filter(|entry| !entry.stale)?;
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Overwrite the value for `key`, e.g. for an optimistic update.
    ///
    /// A fetch of `key` already in flight resolves to this value.
    pub async fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let entry = Slot::new(value, false);
        if let Some(state) = self.inflight.lock().await.get_mut(&key) {
            *state = InFlight::Replaced(entry.clone());
        }
        self.inner.insert(key, entry).await;
    }

    /// Drop `prefix` and every key it is a prefix of. The next read fetches.
    ///
    /// Fetches of matching keys already in flight are refetched when they
    /// complete.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        self.mark_invalidated(|key| key.starts_with(prefix)).await;

        let matching: Vec<Arc<QueryKey>> = self
            .inner
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        for key in &matching {
            self.inner.invalidate(key.as_ref()).await;
        }
        debug!(prefix = %prefix, count = matching.len(), "Invalidated queries");
    }

    /// Drop everything, e.g. on logout.
    pub async fn clear(&self) {
        self.mark_invalidated(|_| true).await;
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.inner.get(key).await.is_some_and(|entry| !entry.stale)
    }

    async fn mark_invalidated(&self, matches: impl Fn(&QueryKey) -> bool) {
        let mut inflight = self.inflight.lock().await;
        for (key, state) in inflight.iter_mut() {
            if matches(key) {
                *state = InFlight::Invalidated;
            }
        }
    }
}

fn downcast<T: Clone + 'static>(key: &QueryKey, entry: &Entry) -> Result<T> {
    entry
        .value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| Error::CacheType(key.to_string()))
}

#[cfg(test)]
mod tests;
