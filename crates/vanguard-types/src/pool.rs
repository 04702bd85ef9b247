use crate::ids::PoolId;

/// A mutable snapshot of one constant-product AMM pool.
///
/// Owned by `vanguard-poolcache`. Readers obtain a `Copy` snapshot (this type
/// is small and `Copy` on purpose) rather than holding a reference into the
/// cache across the simulate/size stages, so a concurrent refresh never
/// blocks a reader mid-computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub pool_id: PoolId,
    /// Reserve of the pool's "A" side, in base units.
    pub reserve_a: u128,
    /// Reserve of the pool's "B" side, in base units.
    pub reserve_b: u128,
    /// Swap fee, in basis points (1 bps = 0.01%).
    pub fee_bps: u16,
    /// Monotonically increasing slot/sequence of the last refresh. Used to
    /// decide whether a cached entry is stale.
    pub slot: u64
}

impl PoolState {
    pub fn new(pool_id: PoolId, reserve_a: u128, reserve_b: u128, fee_bps: u16, slot: u64) -> Self {
        Self { pool_id, reserve_a, reserve_b, fee_bps, slot }
    }

    /// Returns the reserves oriented as (reserve_in, reserve_out) for a swap
    /// in the given direction.
    pub fn oriented(&self, a_to_b: bool) -> (u128, u128) {
        if a_to_b {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        }
    }
}
