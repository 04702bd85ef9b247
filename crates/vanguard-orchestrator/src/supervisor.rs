//! Worker supervision (§4.10): the `Supervisor` owns the worker pool, the
//! shared `PoolCache` refresher, and the `MetricsCore` handle. A worker that
//! raises an `InvariantViolation` is logged, marks the engine unhealthy, and
//! is respawned rather than allowed to bring the whole engine down.

use std::sync::Arc;

use tokio::{
    sync::{mpsc::Receiver, Mutex},
    task::JoinSet
};
use tracing::error;
use vanguard_bundle::{BundleBuilder, Signer};
use vanguard_metrics::MetricsCore;
use vanguard_poolcache::{PoolCache, StateProvider};
use vanguard_prefilter::PreFilter;
use vanguard_queue::QueuedTransaction;
use vanguard_relay::{Relay, RelayDispatcher};
use vanguard_sizer::Estimator;
use vanguard_types::EngineConfig;

use crate::{orchestrator::PipelineOrchestrator, state::CycleOutcome};

type WorkItem = (QueuedTransaction, u64);

/// Drives a fixed-size pool of workers pulling from a shared queue receiver.
/// A worker that escalates an `InvariantViolation` exits its task; the
/// supervisor notices and spawns a fresh one in its place so the pool never
/// shrinks for the life of the engine.
pub struct Supervisor<P, Sg, R> {
    orchestrator: Arc<PipelineOrchestrator<P, Sg, R>>,
    metrics: Arc<MetricsCore>,
    worker_count: usize
}

impl<P, Sg, R> Supervisor<P, Sg, R>
where
    P: StateProvider + Send + Sync + 'static,
    Sg: Signer + Send + Sync + 'static,
    R: Relay + Send + Sync + 'static
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        prefilter: PreFilter,
        pool_cache: PoolCache<P>,
        estimators: Vec<Box<dyn Estimator>>,
        bundle_builder: BundleBuilder<Sg>,
        dispatcher: RelayDispatcher<R>,
        metrics: Arc<MetricsCore>,
        worker_count: usize
    ) -> Result<Self, vanguard_types::ConfigError> {
        let orchestrator = PipelineOrchestrator::new(
            config,
            prefilter,
            pool_cache,
            estimators,
            bundle_builder,
            dispatcher,
            metrics.clone()
        )?;
        Ok(Self { orchestrator: Arc::new(orchestrator), metrics, worker_count: worker_count.max(1) })
    }

    /// Takes ownership of the dequeued-transaction receiver and fans it out
    /// across `worker_count` tasks. Returns once the channel is closed and
    /// every worker has drained and exited.
    pub async fn run(&self, rx: Receiver<WorkItem>) {
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = JoinSet::new();
        for id in 0..self.worker_count {
            workers.spawn(Self::worker_loop(id, self.orchestrator.clone(), self.metrics.clone(), rx.clone()));
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(WorkerExit::ChannelClosed) => {}
                Ok(WorkerExit::Invariant { worker_id }) => {
                    error!(worker_id, "respawning worker after invariant violation");
                    workers.spawn(Self::worker_loop(worker_id, self.orchestrator.clone(), self.metrics.clone(), rx.clone()));
                }
                Err(join_error) => {
                    error!(%join_error, "worker task itself panicked, respawning");
                }
            }
        }
    }

    async fn worker_loop(
        worker_id: usize,
        orchestrator: Arc<PipelineOrchestrator<P, Sg, R>>,
        metrics: Arc<MetricsCore>,
        rx: Arc<Mutex<Receiver<WorkItem>>>
    ) -> WorkerExit {
        loop {
            let next = rx.lock().await.recv().await;
            let Some((queued, current_slot)) = next else {
                return WorkerExit::ChannelClosed;
            };

            match orchestrator.run_cycle(queued, current_slot).await {
                Ok(CycleOutcome::Dispatched { bundle, outcomes }) => {
                    tracing::debug!(bundle_id = %bundle.id(), relay_count = outcomes.len(), "bundle dispatched");
                }
                Ok(CycleOutcome::Dropped { stage, reason }) => {
                    tracing::trace!(?stage, ?reason, "cycle dropped");
                }
                Err(violation) => {
                    error!(worker_id, error = %violation, "worker raised an invariant violation");
                    metrics.mark_unhealthy();
                    return WorkerExit::Invariant { worker_id };
                }
            }
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn metrics(&self) -> &Arc<MetricsCore> {
        &self.metrics
    }
}

enum WorkerExit {
    ChannelClosed,
    Invariant { worker_id: usize }
}
