//! The pipeline orchestrator and its supervisor (§4.8-§4.10): drives one
//! transaction through C1 -> C6 per cycle, enforces the cumulative budget,
//! and restarts workers that raise an invariant violation.

pub mod budget;
pub mod error;
pub mod orchestrator;
pub mod state;
pub mod supervisor;

pub use budget::{BudgetTracker, StageBudgets};
pub use error::InvariantViolation;
pub use orchestrator::PipelineOrchestrator;
pub use state::CycleOutcome;
pub use supervisor::Supervisor;
