//! Assembles a wire-ready [`Bundle`] from unordered candidate legs (§4.5,
//! component C5): validates sandwich slot assignment and the priority-fee
//! policy before delegating to the signer and to `Bundle`'s infallible
//! constructors.

use std::sync::Arc;

use thiserror::Error;
use vanguard_types::{Bundle, BundleId, InvalidSandwichOrder, SandwichSlot, SignedTransaction};

use crate::signer::{Signer, SignerContractBreak};

/// One not-yet-signed leg of a bundle under construction.
#[derive(Debug, Clone)]
pub struct CandidateLeg {
    pub slot: SandwichSlot,
    pub raw: Vec<u8>,
    pub fee: u64
}

impl CandidateLeg {
    pub fn new(slot: SandwichSlot, raw: Vec<u8>, fee: u64) -> Self {
        Self { slot, raw, fee }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    InvalidSandwichOrder(#[from] InvalidSandwichOrder),
    #[error("priority-fee policy unsatisfiable within fee cap {fee_cap}: needed front={needed_front}, back={needed_back}")]
    FeeCapExceeded { fee_cap: u64, needed_front: u64, needed_back: u64 },
    #[error(transparent)]
    Signer(#[from] SignerContractBreak)
}

pub struct BundleBuilder<S> {
    signer: Arc<S>,
    fee_cap: u64
}

impl<S: Signer> BundleBuilder<S> {
    pub fn new(signer: Arc<S>, fee_cap: u64) -> Self {
        Self { signer, fee_cap }
    }

    /// Assembles a sandwich bundle from exactly one `FrontRun`, one
    /// `VictimReference`, and one `BackRun` leg (order in `legs` doesn't
    /// matter, their tagged `slot` does).
    pub async fn build_sandwich(
        &self,
        id: BundleId,
        legs: Vec<CandidateLeg>,
        victim_fee: u64,
        tip: u128,
        target_slot: u64
    ) -> Result<Bundle, BuildError> {
        if legs.len() != 3 {
            return Err(InvalidSandwichOrder::WrongLength(legs.len()).into());
        }
        let front = find_slot(&legs, SandwichSlot::FrontRun)
            .ok_or(InvalidSandwichOrder::WrongLength(legs.len()))?;
        let victim = find_slot(&legs, SandwichSlot::VictimReference)
            .ok_or(InvalidSandwichOrder::WrongLength(legs.len()))?;
        let back = find_slot(&legs, SandwichSlot::BackRun)
            .ok_or(InvalidSandwichOrder::WrongLength(legs.len()))?;

        self.check_fee_policy(victim_fee, front.fee, back.fee)?;

        let front_signed = self.sign(front).await?;
        let victim_signed = self.sign(victim).await?;
        let back_signed = self.sign(back).await?;

        Ok(Bundle::sandwich(id, front_signed, victim_signed, back_signed, tip, target_slot))
    }

    /// Assembles an arbitrage bundle from 1-2 legs, no fixed slot role.
    pub async fn build_arbitrage(
        &self,
        id: BundleId,
        legs: Vec<CandidateLeg>,
        tip: u128,
        target_slot: u64
    ) -> Result<Bundle, BuildError> {
        debug_assert!(!legs.is_empty() && legs.len() <= 2, "arbitrage bundles hold 1-2 legs");
        let mut signed = Vec::with_capacity(legs.len());
        for leg in &legs {
            signed.push(self.sign(leg).await?);
        }
        Ok(Bundle::arbitrage(id, signed, tip, target_slot))
    }

    fn check_fee_policy(&self, victim_fee: u64, front_fee: u64, back_fee: u64) -> Result<(), BuildError> {
        let needed_front = victim_fee.saturating_sub(1);
        let needed_back = victim_fee.saturating_add(1);
        let satisfied = front_fee >= needed_front && back_fee >= needed_back;
        let within_cap = front_fee <= self.fee_cap && back_fee <= self.fee_cap;
        if satisfied && within_cap {
            Ok(())
        } else {
            Err(BuildError::FeeCapExceeded { fee_cap: self.fee_cap, needed_front, needed_back })
        }
    }

    async fn sign(&self, leg: &CandidateLeg) -> Result<SignedTransaction, SignerContractBreak> {
        let signature = self.signer.sign(&leg.raw).await?;
        Ok(SignedTransaction { raw: leg.raw.clone(), signature })
    }
}

fn find_slot(legs: &[CandidateLeg], slot: SandwichSlot) -> Option<&CandidateLeg> {
    legs.iter().find(|leg| leg.slot == slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSigner;

    #[async_trait::async_trait]
    impl Signer for StubSigner {
        async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerContractBreak> {
            Ok(message.iter().rev().copied().collect())
        }
    }

    fn legs(front_fee: u64, back_fee: u64) -> Vec<CandidateLeg> {
        vec![
            CandidateLeg::new(SandwichSlot::FrontRun, vec![1], front_fee),
            CandidateLeg::new(SandwichSlot::VictimReference, vec![2], 10),
            CandidateLeg::new(SandwichSlot::BackRun, vec![3], back_fee)
        ]
    }

    #[tokio::test]
    async fn builds_a_valid_sandwich() {
        let builder = BundleBuilder::new(Arc::new(StubSigner), 1_000);
        let bundle = builder.build_sandwich(BundleId(1), legs(9, 11), 10, 500, 42).await.unwrap();
        assert_eq!(bundle.transactions().len(), 3);
        assert_eq!(bundle.tip(), 500);
    }

    #[tokio::test]
    async fn rejects_fee_policy_violation() {
        let builder = BundleBuilder::new(Arc::new(StubSigner), 1_000);
        // back-run fee must exceed victim's, 10 does not satisfy >10
        let err = builder.build_sandwich(BundleId(1), legs(9, 10), 10, 500, 42).await.unwrap_err();
        assert!(matches!(err, BuildError::FeeCapExceeded { .. }));
    }

    #[tokio::test]
    async fn rejects_fee_above_cap() {
        let builder = BundleBuilder::new(Arc::new(StubSigner), 10);
        let err = builder.build_sandwich(BundleId(1), legs(9, 11), 10, 500, 42).await.unwrap_err();
        assert!(matches!(err, BuildError::FeeCapExceeded { .. }));
    }

    #[tokio::test]
    async fn missing_slot_is_invalid_sandwich_order() {
        let builder = BundleBuilder::new(Arc::new(StubSigner), 1_000);
        let bad_legs = vec![
            CandidateLeg::new(SandwichSlot::FrontRun, vec![1], 9),
            CandidateLeg::new(SandwichSlot::FrontRun, vec![2], 9),
            CandidateLeg::new(SandwichSlot::BackRun, vec![3], 11)
        ];
        let err = builder.build_sandwich(BundleId(1), bad_legs, 10, 500, 42).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidSandwichOrder(_)));
    }
}
