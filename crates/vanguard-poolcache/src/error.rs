use thiserror::Error;
use vanguard_types::PoolId;

/// Outcome of a `PoolCache::get` call that did not yield usable state.
///
/// Kept distinct from [`vanguard_types::DropReason`]: this crate doesn't know
/// which pipeline stage is asking, so it reports the raw lookup failure and
/// leaves stage-tagging to the orchestrator at the pipeline boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolLookupError {
    #[error("pool {0} not resolvable by the state provider")]
    Unknown(PoolId),
    #[error("pool {0} missing or stale and the refresh fetch timed out")]
    StaleMiss(PoolId)
}
