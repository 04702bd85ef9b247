//! The pipeline orchestrator itself (§4.8, component C8): drives one
//! transaction through C1 -> C6, enforcing per-stage and total budgets.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc
};

use tracing::{instrument, warn};
use vanguard_bundle::{BuildError, BundleBuilder, CandidateLeg, Signer};
use vanguard_metrics::MetricsCore;
use vanguard_poolcache::{PoolCache, PoolLookupError, StateProvider};
use vanguard_prefilter::PreFilter;
use vanguard_queue::QueuedTransaction;
use vanguard_relay::{Relay, RelayDispatcher};
use vanguard_sizer::{consensus, Estimator, RawEstimate};
use vanguard_types::{
    BundleId, DropReason, EngineConfig, Opportunity, OpportunityKind, PoolState, SandwichSlot, Stage
};

use crate::{budget::BudgetTracker, error::InvariantViolation, state::CycleOutcome};

/// Drives the full Ingest -> Filter -> Simulate -> Size -> Viability ->
/// Build -> Submit pipeline for one queued transaction at a time.
///
/// Generic over the three external collaborators (§6): a `StateProvider`
/// for pool state, a `Signer` for bundle legs, and a `Relay` set for
/// dispatch. A single orchestrator instance is shared (via `Arc`) across the
/// worker pool; every field it owns is either immutable after construction
/// or internally synchronized (`PoolCache`, `MetricsCore`, the dispatcher's
/// dedup set).
pub struct PipelineOrchestrator<P, Sg, R> {
    config: EngineConfig,
    prefilter: PreFilter,
    pool_cache: PoolCache<P>,
    estimators: Vec<Box<dyn Estimator>>,
    bundle_builder: BundleBuilder<Sg>,
    dispatcher: RelayDispatcher<R>,
    metrics: Arc<MetricsCore>,
    next_bundle_id: AtomicU64
}

impl<P: StateProvider, Sg: Signer, R: Relay> PipelineOrchestrator<P, Sg, R> {
    pub fn new(
        config: EngineConfig,
        prefilter: PreFilter,
        pool_cache: PoolCache<P>,
        estimators: Vec<Box<dyn Estimator>>,
        bundle_builder: BundleBuilder<Sg>,
        dispatcher: RelayDispatcher<R>,
        metrics: Arc<MetricsCore>
    ) -> Result<Self, vanguard_types::ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            prefilter,
            pool_cache,
            estimators,
            bundle_builder,
            dispatcher,
            metrics,
            next_bundle_id: AtomicU64::new(0)
        })
    }

    fn next_bundle_id(&self) -> BundleId {
        BundleId(self.next_bundle_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Runs one transaction through the full pipeline. `current_slot` is the
    /// engine's view of the current slot, used for pool-cache staleness.
    #[instrument(skip(self, queued), target = "vanguard_orchestrator")]
    pub async fn run_cycle(
        &self,
        queued: QueuedTransaction,
        current_slot: u64
    ) -> Result<CycleOutcome, InvariantViolation> {
        let tracker = BudgetTracker::start(self.config.budget_total_us);
        self.metrics.record_transaction_processed();

        macro_rules! drop_at {
            ($stage:expr, $reason:expr) => {{
                let stage = $stage;
                self.metrics.record_stage_latency(stage, tracker.elapsed().as_micros() as u64);
                if let Some(reason) = &$reason {
                    self.metrics.record_drop(reason);
                }
                return Ok(CycleOutcome::Dropped { stage, reason: $reason });
            }};
        }

        // --- Ingest / Parse (C1) ---
        let decoded = match vanguard_parser::decode(&queued.raw) {
            Ok(decoded) => decoded,
            Err(parse_error) => {
                let reason = match parse_error {
                    vanguard_parser::ParseError::MalformedWire { .. } => {
                        DropReason::MalformedWire { stage: Stage::Ingest }
                    }
                    vanguard_parser::ParseError::UnknownVariant(_) => {
                        DropReason::UnknownVariant { stage: Stage::Ingest }
                    }
                    vanguard_parser::ParseError::TruncatedField { .. } => {
                        DropReason::MalformedWire { stage: Stage::Ingest }
                    }
                };
                drop_at!(Stage::Ingest, Some(reason));
            }
        };

        // --- Filter (C2) ---
        if tracker.check(Stage::Filter).is_some() {
            drop_at!(Stage::Filter, Some(DropReason::BudgetExceeded { stage: Stage::Filter }));
        }
        if !self.prefilter.might_target(&decoded.transaction) {
            // "drop silently (not an error)" per §4.8.
            drop_at!(Stage::Filter, None);
        }

        let Some(intent) = decoded.intent else {
            drop_at!(Stage::Filter, None);
        };

        // --- Simulate (C3) ---
        if tracker.check(Stage::Simulate).is_some() {
            drop_at!(Stage::Simulate, Some(DropReason::BudgetExceeded { stage: Stage::Simulate }));
        }
        let pool_state = match self.pool_cache.get(intent.pool_id, current_slot).await {
            Ok(state) => state,
            Err(PoolLookupError::StaleMiss(_)) => {
                drop_at!(Stage::Simulate, Some(DropReason::StaleMiss { stage: Stage::Simulate }));
            }
            Err(PoolLookupError::Unknown(_)) => {
                drop_at!(Stage::Simulate, Some(DropReason::PoolUnknown { stage: Stage::Simulate }));
            }
        };
        if tracker.check(Stage::Size).is_some() {
            drop_at!(Stage::Simulate, Some(DropReason::BudgetExceeded { stage: Stage::Simulate }));
        }

        // --- Size (C4) ---
        let estimates: Vec<RawEstimate> = self
            .estimators
            .iter()
            .filter_map(|estimator| estimator.estimate(&pool_state, intent.amount_in))
            .collect();
        let Some(sizing) = consensus(&estimates) else {
            drop_at!(Stage::Size, Some(DropReason::NoProfitableSize { stage: Stage::Size }));
        };
        if tracker.check(Stage::Viability).is_some() {
            drop_at!(Stage::Size, Some(DropReason::BudgetExceeded { stage: Stage::Size }));
        }

        // --- Viability ---
        let opportunity = self.build_opportunity(&decoded.transaction, &intent, sizing, &pool_state, tracker.elapsed().as_micros() as u64);
        if !opportunity.is_viable(self.config.min_profit_threshold) {
            drop_at!(Stage::Viability, Some(DropReason::BelowThreshold { stage: Stage::Viability }));
        }
        if tracker.check(Stage::Build).is_some() {
            drop_at!(Stage::Viability, Some(DropReason::BudgetExceeded { stage: Stage::Viability }));
        }

        self.metrics.record_opportunity_found();

        // --- Build (C5) ---
        let id = self.next_bundle_id();
        let tip = opportunity.estimated_relay_tip;
        let legs = vec![CandidateLeg::new(
            SandwichSlot::FrontRun,
            decoded.transaction.payload.to_vec(),
            decoded.transaction.fee
        )];
        let bundle = match self.bundle_builder.build_arbitrage(id, legs, tip, current_slot).await {
            Ok(bundle) => bundle,
            Err(BuildError::FeeCapExceeded { .. }) => {
                drop_at!(Stage::Build, Some(DropReason::BelowThreshold { stage: Stage::Build }));
            }
            Err(other) => return Err(InvariantViolation::try_from(other).expect("arbitrage path only raises invariant-class errors besides FeeCapExceeded")),
        };
        if tracker.check(Stage::Submit).is_some() {
            drop_at!(Stage::Build, Some(DropReason::BudgetExceeded { stage: Stage::Build }));
        }

        // --- Submit (C6) ---
        let bundle_bytes = encode_bundle(&bundle);
        let outcomes = match self.dispatcher.dispatch_all(bundle.id(), &bundle_bytes).await {
            Ok(outcomes) => outcomes,
            Err(duplicate) => return Err(InvariantViolation::from(duplicate))
        };

        let net_profit = opportunity.expected_net_profit.max(0) as u128;
        self.metrics.record_bundle_dispatched(net_profit);
        self.metrics.record_stage_latency(Stage::Submit, tracker.elapsed().as_micros() as u64);

        if !outcomes.iter().any(|o| o.success) {
            warn!(bundle_id = %bundle.id(), "bundle dispatched but no relay reported success");
        }

        Ok(CycleOutcome::Dispatched { bundle, outcomes })
    }

    fn build_opportunity(
        &self,
        transaction: &vanguard_types::Transaction<'_>,
        intent: &vanguard_types::SwapIntent,
        sizing: vanguard_types::SizingResult,
        pool_state: &PoolState,
        detected_at_us: u64
    ) -> Opportunity {
        let _ = pool_state;
        let estimated_priority_fee_cost = transaction.priority_fee as u128;
        let estimated_relay_tip = vanguard_bundle::estimate_tip(sizing.expected_gross_profit, 0, 0);
        let expected_net_profit = sizing.expected_gross_profit as i128
            - estimated_priority_fee_cost as i128
            - estimated_relay_tip as i128;

        Opportunity {
            kind: OpportunityKind::Arbitrage,
            origin_tx: transaction.id,
            intent: *intent,
            sizing,
            estimated_compute: transaction.resource_limit,
            estimated_priority_fee_cost,
            estimated_relay_tip,
            expected_net_profit,
            detected_at_us
        }
    }
}

/// Wire-encodes a bundle for dispatch. The concrete wire protocol for any
/// specific chain is a collaborator concern (out of scope, see crate docs);
/// this just concatenates each leg's raw bytes and signature so a `Relay`
/// has something opaque-but-deterministic to submit.
fn encode_bundle(bundle: &vanguard_types::Bundle) -> Vec<u8> {
    let mut out = Vec::with_capacity(bundle.encoded_len());
    for tx in bundle.transactions() {
        out.extend_from_slice(&(tx.raw.len() as u32).to_le_bytes());
        out.extend_from_slice(&tx.raw);
        out.extend_from_slice(&(tx.signature.len() as u32).to_le_bytes());
        out.extend_from_slice(&tx.signature);
    }
    out
}
