//! The `StateProvider` collaborator (§6): fetches pool state the cache
//! doesn't have, or has gone stale.

use std::time::Duration;

use vanguard_types::{PoolId, PoolState};

/// Outcome of a `StateProvider` fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(PoolState),
    NotFound,
    Timeout
}

/// External source of truth for pool state. Implementations talk to whatever
/// backs the "shadow fork" (a node RPC, a local state-diff replayer, or a
/// test fixture); this crate only needs the three outcomes above.
///
/// `Send + Sync` so one provider can be shared across worker threads; object
/// safety is provided by `auto_impl`'s `Arc` blanket so callers can hold
/// `Arc<dyn StateProvider>`.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait StateProvider: Send + Sync {
    /// Fetches current state for `pool_id`. `max_age` bounds how stale a
    /// provider-side cache (if any) is allowed to return; it is not this
    /// crate's staleness check, which happens in [`crate::PoolCache`] itself.
    async fn get_pool(&self, pool_id: PoolId, max_age: Duration) -> FetchOutcome;
}
