//! Shared data model for the searcher pipeline.
//!
//! This crate holds the types every pipeline stage (`vanguard-parser`
//! through `vanguard-relay`) passes between each other, plus the error
//! taxonomy and configuration surface from the engine design. It has no
//! opinion on *how* a stage does its work, only on the shapes that cross
//! stage boundaries.

pub mod bundle;
pub mod config;
pub mod error;
pub mod ids;
pub mod opportunity;
pub mod pool;
pub mod relay;
pub mod sizing;
pub mod stage;
pub mod transaction;

pub use bundle::{Bundle, InvalidSandwichOrder, SandwichSlot, SignedTransaction};
pub use config::EngineConfig;
pub use error::{ConfigError, DropReason};
pub use ids::{Address, BundleId, PoolId, RelayId, TokenId, TxHash};
pub use opportunity::{Opportunity, OpportunityKind};
pub use pool::PoolState;
pub use relay::{RelayError, RelayOutcome};
pub use sizing::SizingResult;
pub use stage::Stage;
pub use transaction::{SwapIntent, Transaction};
