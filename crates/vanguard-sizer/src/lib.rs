//! Optimal front/back-run sizing (§4.4, component C4): a pre-computed table
//! as the primary strategy, with an optional redundancy layer of
//! alternative estimators reconciled by a consensus rule.

pub mod bucket;
pub mod estimator;
pub mod persist;
pub mod table;

pub use bucket::LogBuckets;
pub use estimator::{consensus, Estimator, HeuristicEstimator, NullEstimator, PrecomputedTableEstimator, RawEstimate};
pub use persist::{read_table, write_table, PersistError};
pub use table::{SizingTable, TableCell};
