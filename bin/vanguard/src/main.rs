//! Thin entrypoint (§1, §10): parses a config path plus a couple of
//! environment overrides, wires the pipeline crates together, and drives the
//! supervisor against whatever arrives on stdin as length-prefixed wire
//! frames.
//!
//! Everything here beyond that wiring is a collaborator's concern per §1 —
//! the concrete ingress source, state provider, signer, and relay clients
//! are out of scope for this repository (see `placeholder`).

mod placeholder;

use std::{fs::File, path::PathBuf, sync::Arc};

use clap::Parser;
use eyre::WrapErr;
use tokio::{
    io::{AsyncReadExt, BufReader},
    sync::mpsc
};
use tracing_subscriber::EnvFilter;
use vanguard_bundle::BundleBuilder;
use vanguard_metrics::MetricsCore;
use vanguard_poolcache::PoolCache;
use vanguard_prefilter::PreFilter;
use vanguard_queue::{BackpressureQueue, EnqueueOutcome, QueuedTransaction};
use vanguard_relay::RelayDispatcher;
use vanguard_sizer::{Estimator, HeuristicEstimator};
use vanguard_types::EngineConfig;

use crate::placeholder::{PlaceholderRelay, PlaceholderSigner, PlaceholderStateProvider};

/// Offset of the `priority_fee` field in §4.1's wire frame
/// (`frame_kind` + `id` + `sender` + `target` + `fee`, each fixed-width).
const PRIORITY_FEE_OFFSET: usize = 1 + 32 + 20 + 20 + 8;

#[derive(Parser, Debug)]
#[clap(about = "Vanguard MEV searcher engine")]
struct Cli {
    /// Path to a JSON `EngineConfig` (§6).
    #[clap(short, long)]
    config: PathBuf,
    /// Overrides `num_workers` from the config file.
    #[clap(long)]
    workers: Option<usize>
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let env_filter = EnvFilter::from_default_env();
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let file = File::open(&cli.config).wrap_err_with(|| format!("opening config at {}", cli.config.display()))?;
    let mut config = EngineConfig::from_reader(file).wrap_err("loading engine config")?;
    if let Some(workers) = cli.workers {
        config.num_workers = workers;
    }

    tracing::info!(?config, "engine config loaded");

    let prefilter = PreFilter::build(std::iter::empty(), 0);
    let pool_cache = PoolCache::new(Arc::new(PlaceholderStateProvider));
    let estimators: Vec<Box<dyn Estimator>> = vec![Box::new(HeuristicEstimator::default())];
    let bundle_builder = BundleBuilder::new(Arc::new(PlaceholderSigner), config.max_priority_fee);
    let relays = config
        .relay_urls
        .iter()
        .enumerate()
        .map(|(i, url)| Arc::new(PlaceholderRelay::new(i as u32, url.clone())))
        .collect();
    let dispatcher = RelayDispatcher::new(relays);
    let metrics = Arc::new(MetricsCore::new());
    let worker_count = config.num_workers;

    let supervisor = vanguard_orchestrator::Supervisor::new(
        config.clone(),
        prefilter,
        pool_cache,
        estimators,
        bundle_builder,
        dispatcher,
        metrics,
        worker_count
    )
    .wrap_err("constructing supervisor")?;

    let queue = Arc::new(BackpressureQueue::<QueuedTransaction>::new(config.queue_capacity));
    let (tx, rx) = mpsc::channel(config.queue_capacity.min(4_096));

    let ingress_queue = queue.clone();
    let ingress = tokio::spawn(async move { run_stdin_ingress(ingress_queue).await });
    let forwarder_queue = queue;
    let forwarder = tokio::spawn(async move { forward_queue(forwarder_queue, tx).await });

    tokio::select! {
        _ = supervisor.run(rx) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    ingress.abort();
    forwarder.abort();
    Ok(())
}

/// Reads `u32`-length-prefixed frames from stdin and enqueues them, cheaply
/// lifting `priority_fee` from its fixed wire offset so the queue can order
/// without a full parse (§4.7's rationale for `QueuedTransaction`).
async fn run_stdin_ingress(queue: Arc<BackpressureQueue<QueuedTransaction>>) {
    let mut reader = BufReader::new(tokio::io::stdin());
    loop {
        let mut len_buf = [0u8; 4];
        if reader.read_exact(&mut len_buf).await.is_err() {
            tracing::info!("ingress stream closed");
            return;
        }
        let len = u32::from_le_bytes(len_buf) as usize;
        let mut raw = vec![0u8; len];
        if reader.read_exact(&mut raw).await.is_err() {
            tracing::warn!(len, "ingress stream closed mid-frame");
            return;
        }

        let priority_fee = raw
            .get(PRIORITY_FEE_OFFSET..PRIORITY_FEE_OFFSET + 8)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u64::from_le_bytes)
            .unwrap_or(0);

        let item = QueuedTransaction { raw, priority_fee, arrival_us: 0 };
        match queue.enqueue(item).0 {
            EnqueueOutcome::Rejected => tracing::debug!("queue full, dropping low-priority arrival"),
            EnqueueOutcome::AcceptedWithEviction => tracing::debug!("queue full, evicted lowest-priority resident"),
            EnqueueOutcome::Accepted => {}
        }
    }
}

/// Drains the queue into the worker-facing channel, minting a monotonic
/// slot counter in lieu of a real chain's slot/block number.
async fn forward_queue(queue: Arc<BackpressureQueue<QueuedTransaction>>, tx: mpsc::Sender<(QueuedTransaction, u64)>) {
    let mut slot: u64 = 0;
    loop {
        match queue.dequeue() {
            Some(item) => {
                slot += 1;
                if tx.send((item, slot)).await.is_err() {
                    return;
                }
            }
            None => tokio::time::sleep(std::time::Duration::from_millis(5)).await
        }
    }
}
