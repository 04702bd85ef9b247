//! The item type the queue actually holds.
//!
//! Per the data flow in the overview ("ingress adapter → C7 → C8 drives C1"),
//! the queue sits *before* the wire parser: it holds raw ingress bytes plus
//! the priority-fee the ingress adapter already extracted cheaply (e.g. from
//! a fixed-offset fee field), not a parsed [`vanguard_types::Transaction`]
//! borrowing from a buffer the queue doesn't own.

/// Anything the queue can order by priority-fee.
pub trait Prioritized {
    fn priority(&self) -> u64;
}

/// One raw transaction awaiting pipeline processing.
#[derive(Debug, Clone)]
pub struct QueuedTransaction {
    pub raw: Vec<u8>,
    pub priority_fee: u64,
    pub arrival_us: u64
}

impl Prioritized for QueuedTransaction {
    fn priority(&self) -> u64 {
        self.priority_fee
    }
}
