//! The `Estimator` trait and its implementations (§4.4's "optional
//! redundancy layer", resolved per `SPEC_FULL.md`'s open question: the
//! precomputed table is primary, a closed-form heuristic and a
//! not-yet-implemented learned policy are the two alternates).

use vanguard_types::{PoolState, SizingResult};

use crate::table::SizingTable;

/// A single profit estimate before it's folded into consensus.
#[derive(Debug, Clone, Copy)]
pub struct RawEstimate {
    pub front_run_amount: u128,
    pub back_run_amount: u128,
    pub expected_gross_profit: u128
}

/// One sizing strategy. `vanguard-sizer` never calls more than one
/// `Estimator` concurrently from inside this crate — the orchestrator owns
/// fan-out across a `Vec<Box<dyn Estimator>>` and hands the results to
/// [`consensus`].
pub trait Estimator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Estimates front/back-run sizing for `victim_amount` against `pool`.
    /// Returns `None` when the strategy finds no profitable size.
    fn estimate(&self, pool: &PoolState, victim_amount: u128) -> Option<RawEstimate>;
}

/// Wraps a built [`SizingTable`] as an `Estimator`. The primary strategy.
pub struct PrecomputedTableEstimator {
    table: SizingTable
}

impl PrecomputedTableEstimator {
    pub fn new(table: SizingTable) -> Self {
        Self { table }
    }
}

impl Estimator for PrecomputedTableEstimator {
    fn name(&self) -> &'static str {
        "precomputed_table"
    }

    fn estimate(&self, pool: &PoolState, victim_amount: u128) -> Option<RawEstimate> {
        let liquidity = pool.reserve_a.min(pool.reserve_b);
        let cell = self.table.lookup(victim_amount, liquidity, pool.fee_bps)?;
        if cell.expected_profit == 0 {
            return None;
        }
        Some(RawEstimate {
            front_run_amount: cell.front_run_amount,
            back_run_amount: cell.front_run_amount,
            expected_gross_profit: cell.expected_profit
        })
    }
}

/// Closed-form fallback: sizes the front-run as a fixed fraction of the
/// victim's amount, scaled down as the pool's fee rises. No training data,
/// no persisted state — purely a function of the inputs.
pub struct HeuristicEstimator {
    /// Front-run amount as a fraction of the victim's amount, in basis
    /// points. Default 2000 (20%) is a conservative starting point; callers
    /// tune it per deployment.
    pub front_run_fraction_bps: u32
}

impl Default for HeuristicEstimator {
    fn default() -> Self {
        Self { front_run_fraction_bps: 2_000 }
    }
}

impl Estimator for HeuristicEstimator {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn estimate(&self, pool: &PoolState, victim_amount: u128) -> Option<RawEstimate> {
        let front_run_amount = victim_amount
            .checked_mul(self.front_run_fraction_bps as u128)?
            .checked_div(10_000)?;
        if front_run_amount == 0 {
            return None;
        }
        let (front_out, victim_out, back_out) =
            vanguard_poolcache::simulate_sandwich(pool, front_run_amount, victim_amount, front_run_amount)?;
        let _ = victim_out;
        let back_run_amount = front_out;
        let profit = back_out.checked_sub(front_run_amount)?;
        (profit > 0).then_some(RawEstimate {
            front_run_amount,
            back_run_amount,
            expected_gross_profit: profit
        })
    }
}

/// Placeholder for the learned-policy estimator referenced in the original
/// source but never shipped with trained weights. Always abstains so
/// `consensus` falls back to the other two estimators.
pub struct NullEstimator;

impl Estimator for NullEstimator {
    fn name(&self) -> &'static str {
        "null"
    }

    fn estimate(&self, _pool: &PoolState, _victim_amount: u128) -> Option<RawEstimate> {
        None
    }
}

/// Folds however many estimates survived into one `SizingResult`.
///
/// Agreement within 10% of the maximum estimate raises `consensus = true`
/// and a higher confidence; disagreement falls back to the median estimate
/// with lower confidence. Returns `None` if every estimator abstained or the
/// winning estimate's profit isn't positive.
pub fn consensus(estimates: &[RawEstimate]) -> Option<SizingResult> {
    let mut profits: Vec<u128> = estimates.iter().map(|e| e.expected_gross_profit).collect();
    if profits.is_empty() {
        return None;
    }
    profits.sort_unstable();

    let max = *profits.last()?;
    if max == 0 {
        return None;
    }
    let agree = profits.iter().all(|&p| {
        let diff = max.abs_diff(p);
        diff.saturating_mul(10) <= max
    });

    let winner_profit = if agree { max } else { profits[profits.len() / 2] };
    let winner = estimates
        .iter()
        .find(|e| e.expected_gross_profit == winner_profit)
        .copied()?;

    let confidence = if agree {
        SizingResult::confidence_clamped(70 + estimates.len() as u32 * 10)
    } else {
        SizingResult::confidence_clamped(40)
    };

    Some(SizingResult {
        front_run_amount: winner.front_run_amount,
        back_run_amount: winner.back_run_amount,
        expected_gross_profit: winner.expected_gross_profit,
        confidence,
        consensus: agree
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(profit: u128) -> RawEstimate {
        RawEstimate { front_run_amount: 1, back_run_amount: 1, expected_gross_profit: profit }
    }

    #[test]
    fn agreeing_estimators_raise_consensus() {
        let result = consensus(&[est(1000), est(1020), est(980)]).unwrap();
        assert!(result.consensus);
        assert!(result.confidence >= 70);
    }

    #[test]
    fn disagreeing_estimators_fall_back_to_median() {
        let result = consensus(&[est(100), est(1000), est(2000)]).unwrap();
        assert!(!result.consensus);
        assert_eq!(result.expected_gross_profit, 1000);
    }

    #[test]
    fn all_zero_profit_yields_none() {
        assert!(consensus(&[est(0), est(0)]).is_none());
    }

    #[test]
    fn empty_estimates_yield_none() {
        assert!(consensus(&[]).is_none());
    }
}
