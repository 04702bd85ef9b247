//! Engine-wide atomic counters plus the per-stage table and the
//! `unhealthy` health signal (§4.9, §7).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use vanguard_types::{DropReason, Stage};

use crate::stage::{StageMetrics, StageSnapshot};

/// `DropReason` has 9 variants (§7); indexed by `drop_reason_index` so a
/// drop can be recorded with one atomic increment instead of a locked map
/// lookup.
const DROP_REASON_COUNT: usize = 9;

fn drop_reason_index(reason: &DropReason) -> usize {
    match reason {
        DropReason::MalformedWire { .. } => 0,
        DropReason::UnknownVariant { .. } => 1,
        DropReason::StaleMiss { .. } => 2,
        DropReason::PoolUnknown { .. } => 3,
        DropReason::NoProfitableSize { .. } => 4,
        DropReason::BelowThreshold { .. } => 5,
        DropReason::BudgetExceeded { .. } => 6,
        DropReason::RelayTimeout { .. } => 7,
        DropReason::RelayRejected { .. } => 8
    }
}

fn drop_reason_kind(index: usize) -> &'static str {
    const KINDS: [&str; DROP_REASON_COUNT] = [
        "malformed_wire",
        "unknown_variant",
        "stale_miss",
        "pool_unknown",
        "no_profitable_size",
        "below_threshold",
        "budget_exceeded",
        "relay_timeout",
        "relay_rejected"
    ];
    KINDS[index]
}

/// All counters and per-stage tables the engine maintains. Every update is
/// lock-free; a [`MetricsCore::snapshot`] call is the only place that reads
/// everything together, and even that read never blocks a writer.
pub struct MetricsCore {
    stages: [StageMetrics; Stage::ALL.len()],
    drops_by_reason: [AtomicU64; DROP_REASON_COUNT],
    txs_processed: AtomicU64,
    opportunities_found: AtomicU64,
    bundles_dispatched: AtomicU64,
    /// Saturating accumulator. Real profit values are `u128` elsewhere;
    /// this truncates to `u64::MAX` rather than overflow, which is
    /// acceptable for a monitoring counter (exact profit accounting lives
    /// in the opportunity/bundle records themselves, not in telemetry).
    net_profit_accumulator: AtomicU64,
    unhealthy: AtomicBool
}

impl Default for MetricsCore {
    fn default() -> Self {
        Self {
            stages: std::array::from_fn(|_| StageMetrics::default()),
            drops_by_reason: std::array::from_fn(|_| AtomicU64::new(0)),
            txs_processed: AtomicU64::new(0),
            opportunities_found: AtomicU64::new(0),
            bundles_dispatched: AtomicU64::new(0),
            net_profit_accumulator: AtomicU64::new(0),
            unhealthy: AtomicBool::new(false)
        }
    }
}

impl MetricsCore {
    pub fn new() -> Self {
        Self::default()
    }

    fn stage_index(stage: Stage) -> usize {
        Stage::ALL.iter().position(|s| *s == stage).expect("Stage::ALL is exhaustive")
    }

    pub fn stage(&self, stage: Stage) -> &StageMetrics {
        &self.stages[Self::stage_index(stage)]
    }

    pub fn record_stage_latency(&self, stage: Stage, latency_us: u64) {
        self.stage(stage).record_latency_us(latency_us);
        metrics::histogram!("vanguard_stage_latency_us", latency_us as f64, "stage" => stage.as_str());
    }

    pub fn record_transaction_processed(&self) {
        self.txs_processed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("vanguard_txs_processed", 1);
    }

    pub fn record_opportunity_found(&self) {
        self.opportunities_found.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("vanguard_opportunities_found", 1);
    }

    pub fn record_bundle_dispatched(&self, net_profit: u128) {
        self.bundles_dispatched.fetch_add(1, Ordering::Relaxed);
        self.add_profit(net_profit);
        metrics::counter!("vanguard_bundles_dispatched", 1);
    }

    fn add_profit(&self, profit: u128) {
        let delta = profit.min(u64::MAX as u128) as u64;
        let mut current = self.net_profit_accumulator.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_add(delta);
            match self.net_profit_accumulator.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed
            ) {
                Ok(_) => break,
                Err(observed) => current = observed
            }
        }
    }

    pub fn record_drop(&self, reason: &DropReason) {
        self.drops_by_reason[drop_reason_index(reason)].fetch_add(1, Ordering::Relaxed);
        metrics::counter!("vanguard_drops", 1, "stage" => reason.stage().as_str(), "reason" => reason.kind());
    }

    /// Raises the engine's `unhealthy` health signal. Called by the
    /// supervisor after an invariant-violation error (§7).
    pub fn mark_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }

    /// Clears the `unhealthy` signal once a respawned worker is confirmed
    /// running normally.
    pub fn mark_healthy(&self) {
        self.unhealthy.store(false, Ordering::SeqCst);
    }

    pub fn is_unhealthy(&self) -> bool {
        self.unhealthy.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut stage_snapshots = Vec::with_capacity(Stage::ALL.len());
        for (i, stage) in Stage::ALL.iter().enumerate() {
            stage_snapshots.push((stage.as_str().to_string(), self.stages[i].snapshot()));
        }
        let mut drop_snapshots = Vec::with_capacity(DROP_REASON_COUNT);
        for (i, counter) in self.drops_by_reason.iter().enumerate() {
            drop_snapshots.push((drop_reason_kind(i).to_string(), counter.load(Ordering::Relaxed)));
        }

        MetricsSnapshot {
            stages: stage_snapshots,
            drops_by_reason: drop_snapshots,
            txs_processed: self.txs_processed.load(Ordering::Relaxed),
            opportunities_found: self.opportunities_found.load(Ordering::Relaxed),
            bundles_dispatched: self.bundles_dispatched.load(Ordering::Relaxed),
            net_profit_accumulator: self.net_profit_accumulator.load(Ordering::Relaxed),
            unhealthy: self.is_unhealthy()
        }
    }
}

/// Plain, serializable read-only snapshot pulled by the telemetry sink
/// collaborator (§6) on demand. Deliberately format-neutral: this crate has
/// no opinion on Prometheus/StatsD/whatever encodes it next.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub stages: Vec<(String, StageSnapshot)>,
    pub drops_by_reason: Vec<(String, u64)>,
    pub txs_processed: u64,
    pub opportunities_found: u64,
    pub bundles_dispatched: u64,
    pub net_profit_accumulator: u64,
    pub unhealthy: bool
}

#[cfg(test)]
mod tests {
    use vanguard_types::Stage;

    use super::*;

    #[test]
    fn records_and_snapshots_per_stage_latency() {
        let metrics = MetricsCore::new();
        metrics.record_stage_latency(Stage::Simulate, 500);
        metrics.record_stage_latency(Stage::Simulate, 1500);
        let snap = metrics.snapshot();
        let (_, stage_snap) = snap.stages.iter().find(|(name, _)| name == "simulate").unwrap();
        assert_eq!(stage_snap.sample_count, 2);
    }

    #[test]
    fn drop_counters_are_keyed_by_reason() {
        let metrics = MetricsCore::new();
        metrics.record_drop(&DropReason::StaleMiss { stage: Stage::Simulate });
        metrics.record_drop(&DropReason::StaleMiss { stage: Stage::Simulate });
        metrics.record_drop(&DropReason::BudgetExceeded { stage: Stage::Submit });
        let snap = metrics.snapshot();
        let stale = snap.drops_by_reason.iter().find(|(k, _)| k == "stale_miss").unwrap().1;
        let budget = snap.drops_by_reason.iter().find(|(k, _)| k == "budget_exceeded").unwrap().1;
        assert_eq!(stale, 2);
        assert_eq!(budget, 1);
    }

    #[test]
    fn unhealthy_signal_round_trips() {
        let metrics = MetricsCore::new();
        assert!(!metrics.snapshot().unhealthy);
        metrics.mark_unhealthy();
        assert!(metrics.snapshot().unhealthy);
        metrics.mark_healthy();
        assert!(!metrics.snapshot().unhealthy);
    }

    #[test]
    fn net_profit_accumulates_across_bundles() {
        let metrics = MetricsCore::new();
        metrics.record_bundle_dispatched(1_000);
        metrics.record_bundle_dispatched(2_000);
        assert_eq!(metrics.snapshot().net_profit_accumulator, 3_000);
    }
}
