//! Constant-product AMM math (§4.3).
//!
//! Every formula here uses `u128` with widening (`checked_mul`) intermediate
//! products so a pool with reserves near `u128::MAX / fee_bps` cannot
//! silently wrap before the final division.

use vanguard_types::PoolState;

const BPS_DENOMINATOR: u128 = 10_000;

/// `dy = (y * dx * (10000 - b)) / (x * 10000 + dx * (10000 - b))`, truncating
/// integer division, exactly as specified.
///
/// Returns `dy = 0` for the degenerate edge inputs `dx == 0`, `x == 0`, or
/// `y == 0`, and `None` on overflow.
pub fn amount_out(reserve_in: u128, reserve_out: u128, amount_in: u128, fee_bps: u16) -> Option<u128> {
    if reserve_in == 0 {
        return Some(0);
    }
    let fee_multiplier = BPS_DENOMINATOR.checked_sub(fee_bps as u128)?;
    let numerator = reserve_out.checked_mul(amount_in)?.checked_mul(fee_multiplier)?;
    let denominator = reserve_in
        .checked_mul(BPS_DENOMINATOR)?
        .checked_add(amount_in.checked_mul(fee_multiplier)?)?;
    if denominator == 0 {
        return None;
    }
    Some(numerator / denominator)
}

/// One hop through `pool`, oriented `a_to_b`. Returns the output amount and
/// the pool's reserves after the trade settles (used to chain sandwich hops).
pub fn simulate_hop(
    pool: &PoolState,
    a_to_b: bool,
    amount_in: u128
) -> Option<(u128, (u128, u128))> {
    let (reserve_in, reserve_out) = pool.oriented(a_to_b);
    let out = amount_out(reserve_in, reserve_out, amount_in, pool.fee_bps)?;
    let new_in = reserve_in.checked_add(amount_in)?;
    let new_out = reserve_out.checked_sub(out)?;
    let settled = if a_to_b { (new_in, new_out) } else { (new_out, new_in) };
    Some((out, settled))
}

/// Three-hop sandwich simulation: front-run (a→b), victim (a→b, using the
/// pool state left by the front-run), back-run (b→a, using the state left by
/// the victim). Reserves are threaded through each hop per §4.3.
///
/// Returns `(front_run_out, victim_out, back_run_out)`.
pub fn simulate_sandwich(
    pool: &PoolState,
    front_run_amount: u128,
    victim_amount: u128,
    back_run_amount: u128
) -> Option<(u128, u128, u128)> {
    let (front_out, after_front) = simulate_hop(pool, true, front_run_amount)?;
    let mut intermediate = *pool;
    intermediate.reserve_a = after_front.0;
    intermediate.reserve_b = after_front.1;

    let (victim_out, after_victim) = simulate_hop(&intermediate, true, victim_amount)?;
    intermediate.reserve_a = after_victim.0;
    intermediate.reserve_b = after_victim.1;

    let (back_out, _) = simulate_hop(&intermediate, false, back_run_amount)?;
    Some((front_out, victim_out, back_out))
}

#[cfg(test)]
mod tests {
    use vanguard_types::PoolId;

    use super::*;

    fn pool(reserve_a: u128, reserve_b: u128, fee_bps: u16) -> PoolState {
        PoolState::new(PoolId(1), reserve_a, reserve_b, fee_bps, 0)
    }

    #[test]
    fn matches_hand_computed_example() {
        // x=1_000_000, y=1_000_000, dx=1000, b=30bps
        let out = amount_out(1_000_000, 1_000_000, 1_000, 30).unwrap();
        // dy = (1_000_000 * 1_000 * 9970) / (1_000_000*10000 + 1000*9970)
        //    = 9_970_000_000_000 / 10_009_970_000 = 996
        assert_eq!(out, 996);
    }

    #[test]
    fn zero_reserve_in_is_degenerate() {
        assert_eq!(amount_out(0, 1_000, 1, 30), Some(0));
    }

    #[test]
    fn output_never_exceeds_reserve_out() {
        let out = amount_out(500, 500, 1_000_000, 30).unwrap();
        assert!(out < 500);
    }

    #[test]
    fn sandwich_hops_chain_reserves_forward() {
        let p = pool(10_000_000, 10_000_000, 30);
        let (front, victim, back) = simulate_sandwich(&p, 50_000, 100_000, 49_500).unwrap();
        assert!(front > 0);
        assert!(victim > 0);
        assert!(back > 0);
    }

    proptest::proptest! {
        #[test]
        fn never_overflows_for_large_reserves(
            reserve_in in 1u128..=u128::MAX / 20_000,
            reserve_out in 1u128..=u128::MAX / 20_000,
            amount_in in 0u128..=u128::MAX / 20_000,
            fee_bps in 0u16..=9_999
        ) {
            // should not panic regardless of outcome
            let _ = amount_out(reserve_in, reserve_out, amount_in, fee_bps);
        }
    }
}
