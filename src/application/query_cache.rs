//! Per-query cache with a staleness window.
//!
//! Each cached query lives in its own [`QuerySlot`]. Writes are
//! last-write-wins, except that a fetch started before an invalidation never
//! writes its (possibly pre-invalidation) result back.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::app_error::AppResult;

/// Identity of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKey {
    CurrentUser,
    TrialStatus,
    SubscriptionStatus,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::CurrentUser => "/api/auth/user",
            QueryKey::TrialStatus => "/api/trial-status",
            QueryKey::SubscriptionStatus => "/api/subscription-status",
        }
    }
}

/// What an observer of a query currently sees.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never fetched, or invalidated with nothing in flight
    Idle,
    /// First fetch in flight, nothing to show yet
    Loading,
    /// Last fetched value, possibly stale
    Loaded(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

struct SlotInner<T> {
    cached: Option<Cached<T>>,
    in_flight: usize,
    generation: u64,
}

pub struct QuerySlot<T> {
    key: QueryKey,
    stale_after: Duration,
    inner: Mutex<SlotInner<T>>,
}

impl<T: Clone> QuerySlot<T> {
    pub fn new(key: QueryKey, stale_after: Duration) -> Self {
        Self {
            key,
            stale_after,
            inner: Mutex::new(SlotInner {
                cached: None,
                in_flight: 0,
                generation: 0,
            }),
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn state(&self) -> QueryState<T> {
        let inner = self.lock();
        match (&inner.cached, inner.in_flight) {
            (Some(c), _) => QueryState::Loaded(c.value.clone()),
            (None, 0) => QueryState::Idle,
            (None, _) => QueryState::Loading,
        }
    }

    /// Cached value if it is still within the staleness window.
    pub fn fresh(&self) -> Option<T> {
        let inner = self.lock();
        inner
            .cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.stale_after)
            .map(|c| c.value.clone())
    }

    /// Return the fresh value, or run `fetch` and cache its result.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(value) = self.fresh() {
            debug!(query = self.key.as_str(), "cache hit");
            return Ok(value);
        }
        self.refetch(fetch()).await
    }

    /// Run `fut` regardless of freshness and cache its result.
    ///
    /// Errors leave the previous value in place.
    pub async fn refetch<Fut>(&self, fut: Fut) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        let started_in = {
            let mut inner = self.lock();
            inner.in_flight += 1;
            inner.generation
        };
        let _guard = InFlightGuard { slot: self };

        let value = fut.await?;

        let mut inner = self.lock();
        if inner.generation == started_in {
            inner.cached = Some(Cached {
                value: value.clone(),
                fetched_at: Instant::now(),
            });
        } else {
            debug!(query = self.key.as_str(), "dropping result fetched before invalidation");
        }
        Ok(value)
    }

    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.cached = None;
        inner.generation += 1;
        debug!(query = self.key.as_str(), "invalidated");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner<T>> {
        // Nothing panics while holding the lock; recover the data if it ever does
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Decrements the in-flight count even when the fetch future is dropped.
struct InFlightGuard<'a, T> {
    slot: &'a QuerySlot<T>,
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.slot.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}
