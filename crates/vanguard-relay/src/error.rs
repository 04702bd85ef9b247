use thiserror::Error;
use vanguard_types::BundleId;

/// Fatal per §7: the same bundle must never be dispatched twice within one
/// pipeline cycle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("bundle {0} was already dispatched this cycle")]
pub struct DuplicateDispatch(pub BundleId);

/// Operational per §7: raised when the failover selector has no healthy
/// relay left to choose from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no healthy relay is available for dispatch")]
pub struct RelayUnhealthy;
