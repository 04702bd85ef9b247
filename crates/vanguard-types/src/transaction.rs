use crate::ids::{Address, PoolId, TokenId, TxHash};

/// A borrowed view over one pending transaction.
///
/// Produced by the wire parser (`vanguard-parser`) directly over the ingress
/// byte buffer: every field here either is `Copy` or borrows from `payload`'s
/// backing slice. The view's lifetime is bounded by one pipeline cycle; it is
/// never mutated after construction.
#[derive(Debug, Clone, Copy)]
pub struct Transaction<'a> {
    pub id: TxHash,
    pub sender: Address,
    /// The contract/program this transaction calls.
    pub target: Address,
    /// Raw call payload, borrowed from the ingress buffer.
    pub payload: &'a [u8],
    /// Fee the sender declared they're willing to pay, in base fee units.
    pub fee: u64,
    /// Priority fee / tip offered on top of `fee`, used for queue ordering.
    pub priority_fee: u64,
    /// Declared compute/gas resource limit.
    pub resource_limit: u64,
    /// Microsecond timestamp at which the ingress adapter observed this
    /// transaction.
    pub arrival_us: u64
}

impl<'a> Transaction<'a> {
    /// Total fee-based priority used by the backpressure queue's ordering.
    ///
    /// Saturates rather than overflows: a transaction cannot be worth less
    /// priority than `u64::MAX` just because its declared fees summed past it.
    pub fn queue_priority(&self) -> u64 {
        self.fee.saturating_add(self.priority_fee)
    }
}

/// Decoded swap intent, present only when the payload decodes cleanly against
/// a known DEX program ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapIntent {
    pub token_in: TokenId,
    pub token_out: TokenId,
    /// Input amount in the token's base units.
    pub amount_in: u128,
    /// Minimum output the sender will accept (their slippage bound).
    pub min_amount_out: u128,
    pub pool_id: PoolId
}
