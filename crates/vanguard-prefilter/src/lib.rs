//! Bloom-filter pre-filter (§4.2, component C2).
//!
//! Answers "is this transaction's target worth simulating" in constant time.
//! The filter is read-only after [`PreFilter::build`]: updates never mutate
//! bits in place while readers are active, they build a fresh filter and the
//! caller swaps it in (see [`PreFilter::rebuilt_with`]).

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;
use vanguard_types::Transaction;

/// Default bit-array size: 2^20 bits (128 KiB), per §4.2's recommendation.
pub const DEFAULT_NUM_BITS: usize = 1 << 20;
/// Default number of hash functions.
pub const DEFAULT_NUM_HASHES: u32 = 7;

/// Fixed-size bit-array bloom filter over target addresses.
///
/// Membership queries never produce false negatives; false positives are
/// bounded by construction (§4.2 targets ≤0.1% at ≤10^5 inserted elements,
/// which `DEFAULT_NUM_BITS`/`DEFAULT_NUM_HASHES` satisfy).
#[derive(Debug, Clone)]
pub struct PreFilter {
    bits: Vec<u64>,
    num_bits: usize,
    num_hashes: u32,
    seed: u64
}

impl PreFilter {
    /// Builds a filter over `targets`, hashing each with `num_hashes`
    /// siphash rounds keyed by `seed`.
    ///
    /// `seed` makes hashing deterministic across engine restarts and across
    /// independent engines sharing a config (§8's determinism property):
    /// two engines built from the same seed and target set produce
    /// bit-identical filters.
    pub fn build(targets: impl IntoIterator<Item = [u8; 20]>, seed: u64) -> Self {
        Self::with_params(targets, seed, DEFAULT_NUM_BITS, DEFAULT_NUM_HASHES)
    }

    pub fn with_params(
        targets: impl IntoIterator<Item = [u8; 20]>,
        seed: u64,
        num_bits: usize,
        num_hashes: u32
    ) -> Self {
        let words = num_bits.div_ceil(64);
        let mut filter =
            Self { bits: vec![0u64; words], num_bits, num_hashes, seed };
        for target in targets {
            filter.insert(&target);
        }
        filter
    }

    /// Produces a new filter containing the union of this filter's original
    /// insert set plus `additional` targets.
    ///
    /// Callers swap the whole filter in (an atomic pointer or `ArcSwap`
    /// store), never mutate a filter readers may be querying concurrently.
    /// This crate does not own that swap primitive; it belongs to whatever
    /// holds the `PreFilter` (the orchestrator's shared state).
    pub fn rebuilt_with(&self, additional: impl IntoIterator<Item = [u8; 20]>) -> Self {
        let mut next = self.clone();
        for target in additional {
            next.insert(&target);
        }
        next
    }

    fn insert(&mut self, target: &[u8; 20]) {
        for h in self.hash_indices(target) {
            let word = h / 64;
            let bit = h % 64;
            self.bits[word] |= 1u64 << bit;
        }
    }

    fn hash_indices(&self, target: &[u8; 20]) -> impl Iterator<Item = usize> + '_ {
        let (h1, h2) = self.double_hash(target);
        (0..self.num_hashes).map(move |i| {
            let combined = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (combined % self.num_bits as u64) as usize
        })
    }

    /// Standard double-hashing scheme (Kirsch-Mitzenmacher): derive `k`
    /// indices from two independent siphash outputs instead of running `k`
    /// separate hashers.
    fn double_hash(&self, target: &[u8; 20]) -> (u64, u64) {
        let mut first = SipHasher13::new_with_keys(self.seed, 0);
        target.hash(&mut first);
        let h1 = first.finish();

        let mut second = SipHasher13::new_with_keys(0, self.seed ^ 0x9E37_79B9_7F4A_7C15);
        target.hash(&mut second);
        let h2 = second.finish() | 1; // keep h2 odd so it can't degenerate every index to h1

        (h1, h2)
    }

    /// Returns `true` if `target` may be a monitored program (with bounded
    /// false-positive probability) or `false` if it is definitely not.
    pub fn might_target_address(&self, target: &[u8; 20]) -> bool {
        self.hash_indices(target).all(|h| {
            let word = h / 64;
            let bit = h % 64;
            self.bits[word] & (1u64 << bit) != 0
        })
    }

    /// Convenience wrapper querying a decoded transaction's `target` field.
    pub fn might_target(&self, transaction: &Transaction<'_>) -> bool {
        self.might_target_address(&transaction.target)
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> [u8; 20] {
        [byte; 20]
    }

    #[test]
    fn members_never_false_negative() {
        let targets: Vec<[u8; 20]> = (0..=255u8).step_by(3).map(addr).collect();
        let filter = PreFilter::build(targets.clone(), 42);
        for target in &targets {
            assert!(filter.might_target_address(target), "false negative for {target:?}");
        }
    }

    #[test]
    fn disjoint_address_is_usually_rejected() {
        let targets: Vec<[u8; 20]> = vec![addr(1), addr(2), addr(3)];
        let filter = PreFilter::build(targets, 7);
        assert!(!filter.might_target_address(&addr(200)));
    }

    #[test]
    fn same_seed_and_inputs_produce_identical_filters() {
        let targets = vec![addr(9), addr(10)];
        let a = PreFilter::build(targets.clone(), 1234);
        let b = PreFilter::build(targets, 1234);
        assert_eq!(a.bits, b.bits);
    }

    #[test]
    fn rebuild_preserves_original_membership() {
        let base = PreFilter::build(vec![addr(5)], 1);
        let rebuilt = base.rebuilt_with(vec![addr(6)]);
        assert!(rebuilt.might_target_address(&addr(5)));
        assert!(rebuilt.might_target_address(&addr(6)));
    }

    proptest::proptest! {
        #[test]
        fn false_positive_rate_stays_bounded(seed: u64) {
            let targets: Vec<[u8; 20]> = (0..2000u32).map(|i| {
                let mut a = [0u8; 20];
                a[..4].copy_from_slice(&i.to_le_bytes());
                a
            }).collect();
            let filter = PreFilter::build(targets.clone(), seed);

            let probes: Vec<[u8; 20]> = (2000..12000u32).map(|i| {
                let mut a = [0u8; 20];
                a[..4].copy_from_slice(&i.to_le_bytes());
                a
            }).collect();
            let false_positives = probes.iter().filter(|p| filter.might_target_address(p)).count();
            // generous slack above the 0.1% design target to keep this deterministic-ish
            // across seeds without being a tight statistical assertion
            proptest::prop_assert!(false_positives * 1000 <= probes.len());
        }
    }
}
