//! Per-relay rolling stats and health tracking (§4.6, supplemented per
//! `SPEC_FULL.md`: automatic exclusion after N consecutive failures).

use std::sync::atomic::{AtomicU64, Ordering};

use vanguard_types::RelayOutcome;

pub const DEFAULT_CONSECUTIVE_FAILURE_THRESHOLD: u32 = 5;

/// Atomic rolling stats for one relay. `success_count`/`attempt_count` track
/// an all-time rolling success rate (simple ratio, not windowed — windowing
/// would need a ring buffer this crate doesn't need for the failover
/// decision it feeds); `consecutive_failures` is what actually drives health.
#[derive(Debug, Default)]
pub struct RelayHealth {
    attempt_count: AtomicU64,
    success_count: AtomicU64,
    consecutive_failures: AtomicU64,
    /// Sum of observed latencies in microseconds, for a cheap mean; p50/p99
    /// percentile tracking needs a real histogram and is left to the
    /// telemetry sink collaborator, which receives every `RelayOutcome`.
    latency_sum_us: AtomicU64,
    threshold: u64
}

impl RelayHealth {
    pub fn new(consecutive_failure_threshold: u32) -> Self {
        Self { threshold: consecutive_failure_threshold as u64, ..Default::default() }
    }

    pub fn record(&self, outcome: &RelayOutcome) {
        self.attempt_count.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us.fetch_add(outcome.latency.as_micros() as u64, Ordering::Relaxed);
        if outcome.success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
            self.consecutive_failures.store(0, Ordering::Relaxed);
        } else {
            self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Rolling success rate in `[0.0, 1.0]`. Returns `1.0` for a relay with
    /// no attempts yet, so a fresh relay isn't penalized by the failover
    /// selector before it's had a chance to run.
    pub fn success_rate(&self) -> f64 {
        let attempts = self.attempt_count.load(Ordering::Relaxed);
        if attempts == 0 {
            return 1.0;
        }
        self.success_count.load(Ordering::Relaxed) as f64 / attempts as f64
    }

    pub fn mean_latency_us(&self) -> u64 {
        let attempts = self.attempt_count.load(Ordering::Relaxed);
        if attempts == 0 {
            return 0;
        }
        self.latency_sum_us.load(Ordering::Relaxed) / attempts
    }

    /// `true` once consecutive failures reach the configured threshold. The
    /// dispatcher excludes an unhealthy relay from fan-out and raises
    /// `RelayUnhealthy` (operational class, §7).
    pub fn is_unhealthy(&self) -> bool {
        self.consecutive_failures.load(Ordering::Relaxed) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vanguard_types::{RelayId, RelayError};

    use super::*;

    fn success() -> RelayOutcome {
        RelayOutcome::success(RelayId(1), vanguard_types::BundleId(1), Duration::from_millis(10))
    }

    fn failure() -> RelayOutcome {
        RelayOutcome::failure(RelayId(1), Duration::from_millis(10), RelayError::Timeout)
    }

    #[test]
    fn fresh_relay_is_healthy_with_full_success_rate() {
        let health = RelayHealth::new(3);
        assert_eq!(health.success_rate(), 1.0);
        assert!(!health.is_unhealthy());
    }

    #[test]
    fn consecutive_failures_trip_unhealthy() {
        let health = RelayHealth::new(2);
        health.record(&failure());
        assert!(!health.is_unhealthy());
        health.record(&failure());
        assert!(health.is_unhealthy());
    }

    #[test]
    fn a_success_resets_the_consecutive_counter() {
        let health = RelayHealth::new(2);
        health.record(&failure());
        health.record(&success());
        health.record(&failure());
        assert!(!health.is_unhealthy());
    }
}
