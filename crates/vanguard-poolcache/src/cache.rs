//! The pool cache itself (§4.3): many readers, one refresher, bounded
//! capacity, refresh-on-read-if-stale.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Duration
};

use parking_lot::RwLock;
use tracing::{instrument, warn};
use vanguard_types::{PoolId, PoolState};

use crate::{
    error::PoolLookupError,
    provider::{FetchOutcome, StateProvider}
};

pub const DEFAULT_CAPACITY: usize = 1_000;
pub const DEFAULT_STALE_AFTER_SLOTS: u64 = 1;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(2);

/// Hot in-memory map of AMM pool state.
///
/// Readers never block on the refresher: state lives behind a
/// [`parking_lot::RwLock`], held only for the duration of a map lookup or
/// insert, never across the `StateProvider` I/O call itself. This satisfies
/// §5's "no reader ever blocks a writer" by construction — a refresh fetch
/// happens entirely outside the lock, and only the resulting snapshot is
/// published back under a short write-lock.
pub struct PoolCache<P> {
    provider: Arc<P>,
    capacity: usize,
    stale_after_slots: u64,
    fetch_timeout: Duration,
    entries: RwLock<HashMap<PoolId, PoolState>>,
    insertion_order: RwLock<VecDeque<PoolId>>
}

impl<P: StateProvider> PoolCache<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_params(
            provider,
            DEFAULT_CAPACITY,
            DEFAULT_STALE_AFTER_SLOTS,
            DEFAULT_FETCH_TIMEOUT
        )
    }

    pub fn with_params(
        provider: Arc<P>,
        capacity: usize,
        stale_after_slots: u64,
        fetch_timeout: Duration
    ) -> Self {
        Self {
            provider,
            capacity,
            stale_after_slots,
            fetch_timeout,
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            insertion_order: RwLock::new(VecDeque::with_capacity(capacity))
        }
    }

    /// Returns a snapshot for `pool_id`, refreshing synchronously on a miss
    /// or a stale hit. `current_slot` is the caller's view of the current
    /// slot/sequence, used against each entry's `slot` to decide staleness.
    #[instrument(skip(self), target = "vanguard_poolcache", fields(pool_id = %pool_id))]
    pub async fn get(&self, pool_id: PoolId, current_slot: u64) -> Result<PoolState, PoolLookupError> {
        if let Some(state) = self.cached_fresh(pool_id, current_slot) {
            return Ok(state);
        }

        match tokio::time::timeout(self.fetch_timeout, self.provider.get_pool(pool_id, self.fetch_timeout))
            .await
        {
            Ok(FetchOutcome::Found(state)) => {
                self.publish(pool_id, state);
                Ok(state)
            }
            Ok(FetchOutcome::NotFound) => Err(PoolLookupError::Unknown(pool_id)),
            Ok(FetchOutcome::Timeout) | Err(_) => {
                warn!(%pool_id, "state provider fetch timed out");
                Err(PoolLookupError::StaleMiss(pool_id))
            }
        }
    }

    fn cached_fresh(&self, pool_id: PoolId, current_slot: u64) -> Option<PoolState> {
        let entries = self.entries.read();
        let state = entries.get(&pool_id)?;
        let age = current_slot.saturating_sub(state.slot);
        (age <= self.stale_after_slots).then_some(*state)
    }

    fn publish(&self, pool_id: PoolId, state: PoolState) {
        let mut entries = self.entries.write();
        let is_new = !entries.contains_key(&pool_id);
        entries.insert(pool_id, state);
        drop(entries);

        if is_new {
            let mut order = self.insertion_order.write();
            order.push_back(pool_id);
            if order.len() > self.capacity {
                if let Some(evicted) = order.pop_front() {
                    self.entries.write().remove(&evicted);
                }
            }
        }
    }

    /// Number of entries currently resident. Exposed for metrics/tests.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vanguard_types::PoolId;

    use super::*;

    struct FixedProvider {
        state: PoolState,
        calls: AtomicUsize
    }

    #[async_trait::async_trait]
    impl StateProvider for FixedProvider {
        async fn get_pool(&self, _pool_id: PoolId, _max_age: Duration) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FetchOutcome::Found(self.state)
        }
    }

    struct TimeoutProvider;

    #[async_trait::async_trait]
    impl StateProvider for TimeoutProvider {
        async fn get_pool(&self, _pool_id: PoolId, max_age: Duration) -> FetchOutcome {
            tokio::time::sleep(max_age * 10).await;
            FetchOutcome::Timeout
        }
    }

    struct NotFoundProvider;

    #[async_trait::async_trait]
    impl StateProvider for NotFoundProvider {
        async fn get_pool(&self, _pool_id: PoolId, _max_age: Duration) -> FetchOutcome {
            FetchOutcome::NotFound
        }
    }

    #[tokio::test]
    async fn miss_triggers_fetch_then_hits_are_served_from_cache() {
        let state = PoolState::new(PoolId(1), 1_000, 1_000, 30, 5);
        let provider = Arc::new(FixedProvider { state, calls: AtomicUsize::new(0) });
        let cache = PoolCache::new(provider.clone());

        let first = cache.get(PoolId(1), 5).await.unwrap();
        assert_eq!(first, state);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        // same slot: fresh, should not refetch
        let second = cache.get(PoolId(1), 5).await.unwrap();
        assert_eq!(second, state);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_entry_triggers_refresh() {
        let state = PoolState::new(PoolId(1), 1_000, 1_000, 30, 5);
        let provider = Arc::new(FixedProvider { state, calls: AtomicUsize::new(0) });
        let cache = PoolCache::with_params(provider.clone(), 10, 1, Duration::from_millis(2));

        cache.get(PoolId(1), 5).await.unwrap();
        // 3 slots later, beyond stale_after_slots=1, must refetch
        cache.get(PoolId(1), 8).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_timeout_yields_stale_miss() {
        let cache = PoolCache::with_params(
            Arc::new(TimeoutProvider),
            10,
            1,
            Duration::from_millis(1)
        );
        let err = cache.get(PoolId(9), 0).await.unwrap_err();
        assert_eq!(err, PoolLookupError::StaleMiss(PoolId(9)));
    }

    #[tokio::test]
    async fn unknown_pool_yields_unknown_error() {
        let cache = PoolCache::new(Arc::new(NotFoundProvider));
        let err = cache.get(PoolId(42), 0).await.unwrap_err();
        assert_eq!(err, PoolLookupError::Unknown(PoolId(42)));
    }

    #[tokio::test]
    async fn capacity_evicts_oldest_entry() {
        let state = PoolState::new(PoolId(0), 1, 1, 30, 0);
        let provider = Arc::new(FixedProvider { state, calls: AtomicUsize::new(0) });
        let cache = PoolCache::with_params(provider, 2, 1, Duration::from_millis(2));

        for id in 0..3u64 {
            let mut s = state;
            s.pool_id = PoolId(id);
            cache.publish(PoolId(id), s);
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.cached_fresh(PoolId(0), 0).is_none());
        assert!(cache.cached_fresh(PoolId(2), 0).is_some());
    }
}
