use crate::{ids::TxHash, sizing::SizingResult, transaction::SwapIntent};

/// Which strategy produced an [`Opportunity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpportunityKind {
    Arbitrage,
    /// Research-only: see `EngineConfig::enable_sandwich` and
    /// `EngineConfig::simulation_only`. Never built into a live bundle unless
    /// both are set appropriately at startup.
    Sandwich
}

/// A detected, not-yet-built profitable response to a pending transaction.
#[derive(Debug, Clone, Copy)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    /// Hash of the transaction this opportunity responds to.
    pub origin_tx: TxHash,
    pub intent: SwapIntent,
    pub sizing: SizingResult,
    pub estimated_compute: u64,
    pub estimated_priority_fee_cost: u128,
    pub estimated_relay_tip: u128,
    /// `sizing.expected_gross_profit` minus fee/tip estimates above. Signed:
    /// a negative value means the opportunity must not reach Build.
    pub expected_net_profit: i128,
    pub detected_at_us: u64
}

impl Opportunity {
    /// The viability check from §4.8's Viability stage.
    pub fn is_viable(&self, min_profit_threshold: u128) -> bool {
        self.expected_net_profit > 0 && (self.expected_net_profit as u128) > min_profit_threshold
    }
}
