/// Result of sizing a front-run/back-run pair against a victim swap.
///
/// A `SizingResult` is only ever constructed with a positive
/// `expected_gross_profit` — see `vanguard-sizer`'s lookup routine, which
/// returns `None` rather than a zero-or-negative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingResult {
    pub front_run_amount: u128,
    pub back_run_amount: u128,
    pub expected_gross_profit: u128,
    /// Confidence in `[0, 100]`.
    pub confidence: u8,
    /// True when every estimator consulted agreed within the configured
    /// tolerance (see §4.4's redundancy layer).
    pub consensus: bool
}

impl SizingResult {
    pub fn confidence_clamped(confidence: u32) -> u8 {
        confidence.min(100) as u8
    }
}
