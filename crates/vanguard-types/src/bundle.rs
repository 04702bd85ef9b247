use thiserror::Error;

use crate::ids::BundleId;

/// One signed, wire-ready transaction inside a [`Bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Encoded transaction bytes, pre-signature.
    pub raw: Vec<u8>,
    /// Signature produced by the `Signer` collaborator.
    pub signature: Vec<u8>
}

/// The role a transaction plays inside a sandwich bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandwichSlot {
    FrontRun,
    /// The victim is referenced by hash, never rewritten or re-signed.
    VictimReference,
    BackRun
}

/// An ordered, atomically-submitted group of transactions.
///
/// The ordering invariant in §4.5 is enforced at construction: there is no
/// public way to obtain a `Bundle` whose transaction order violates it, and
/// no setter exists to mutate `transactions` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    id: BundleId,
    transactions: Vec<SignedTransaction>,
    tip: u128,
    target_slot: u64
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSandwichOrder {
    #[error("sandwich bundle must contain exactly 3 transactions, got {0}")]
    WrongLength(usize)
}

impl Bundle {
    /// Builds an arbitrage bundle: 1-2 swap transactions, no fixed slot role.
    pub fn arbitrage(
        id: BundleId,
        transactions: Vec<SignedTransaction>,
        tip: u128,
        target_slot: u64
    ) -> Self {
        debug_assert!(!transactions.is_empty() && transactions.len() <= 2);
        Self { id, transactions, tip, target_slot }
    }

    /// Builds a sandwich bundle, enforcing the `[front-run, victim,
    /// back-run]` ordering invariant. The victim transaction is passed in as
    /// a reference copy (e.g. re-broadcast of the observed bytes), never
    /// rewritten.
    ///
    /// The `[front-run, victim, back-run]` order is guaranteed by the
    /// signature: there is no slice-based constructor for sandwich bundles,
    /// so a caller cannot accidentally transpose slots. Callers assembling a
    /// sandwich from unordered candidate legs (see `vanguard-bundle`'s
    /// `BundleBuilder`) must validate slot assignment themselves and surface
    /// [`InvalidSandwichOrder`] before reaching this constructor.
    pub fn sandwich(
        id: BundleId,
        front_run: SignedTransaction,
        victim_reference: SignedTransaction,
        back_run: SignedTransaction,
        tip: u128,
        target_slot: u64
    ) -> Self {
        Self { id, transactions: vec![front_run, victim_reference, back_run], tip, target_slot }
    }

    pub fn id(&self) -> BundleId {
        self.id
    }

    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.transactions
    }

    pub fn tip(&self) -> u128 {
        self.tip
    }

    pub fn target_slot(&self) -> u64 {
        self.target_slot
    }

    /// Serialized length of all transactions plus signatures, used as a
    /// cheap proxy for dispatch payload size.
    pub fn encoded_len(&self) -> usize {
        self.transactions
            .iter()
            .map(|tx| tx.raw.len() + tx.signature.len())
            .sum()
    }
}
