use std::{collections::HashMap, time::Duration};

use parking_lot::Mutex;
use vanguard_poolcache::{FetchOutcome, StateProvider};
use vanguard_types::{PoolId, PoolState};

/// In-memory `StateProvider` double. Returns whatever was seeded via
/// [`MockStateProvider::seed`], `FetchOutcome::NotFound` for anything else,
/// or forces `FetchOutcome::Timeout` for ids listed via
/// [`MockStateProvider::force_timeout`].
#[derive(Debug, Default)]
pub struct MockStateProvider {
    pools: Mutex<HashMap<PoolId, PoolState>>,
    timeouts: Mutex<Vec<PoolId>>,
    /// Real wall-clock delay injected before responding, for simulating a
    /// slow backing store (§8 scenario S4) rather than the provider's own
    /// `FetchOutcome::Timeout` signal.
    delays: Mutex<HashMap<PoolId, Duration>>
}

impl MockStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, pool: PoolState) {
        self.pools.lock().insert(pool.pool_id, pool);
    }

    pub fn force_timeout(&self, pool_id: PoolId) {
        self.timeouts.lock().push(pool_id);
    }

    /// Makes every future fetch for `pool_id` sleep for `delay` before
    /// returning, to simulate a slow-but-eventually-successful backing
    /// store that blows through the pipeline's total budget.
    pub fn seed_with_delay(&self, pool: PoolState, delay: Duration) {
        self.delays.lock().insert(pool.pool_id, delay);
        self.seed(pool);
    }
}

#[async_trait::async_trait]
impl StateProvider for MockStateProvider {
    async fn get_pool(&self, pool_id: PoolId, _max_age: Duration) -> FetchOutcome {
        if let Some(delay) = self.delays.lock().get(&pool_id).copied() {
            tokio::time::sleep(delay).await;
        }
        if self.timeouts.lock().contains(&pool_id) {
            return FetchOutcome::Timeout;
        }
        match self.pools.lock().get(&pool_id) {
            Some(pool) => FetchOutcome::Found(*pool),
            None => FetchOutcome::NotFound
        }
    }
}
