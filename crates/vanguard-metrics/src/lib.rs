//! Lock-free metrics core (§4.9, component C9): per-stage latency stats,
//! engine-wide counters, and a format-neutral snapshot for the telemetry
//! sink collaborator.

pub mod engine;
pub mod stage;

pub use engine::{MetricsCore, MetricsSnapshot};
pub use stage::{StageMetrics, StageSnapshot};
