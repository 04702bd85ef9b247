//! Fatal-class errors a worker can raise (§7): invariant violations unwind
//! the worker and mark the engine degraded; the supervisor restarts it.

use thiserror::Error;
use vanguard_bundle::{BuildError, SignerContractBreak};
use vanguard_relay::DuplicateDispatch;
use vanguard_types::InvalidSandwichOrder;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error(transparent)]
    InvalidSandwichOrder(#[from] InvalidSandwichOrder),
    #[error(transparent)]
    DuplicateDispatch(#[from] DuplicateDispatch),
    #[error(transparent)]
    SignerContractBreak(#[from] SignerContractBreak)
}

impl TryFrom<BuildError> for InvariantViolation {
    type Error = BuildError;

    /// `BuildError::FeeCapExceeded` is a transient condition (drop this
    /// cycle), not a bug, so it isn't convertible — the caller should handle
    /// it as a `DropReason`-style drop instead of escalating to the
    /// supervisor.
    fn try_from(error: BuildError) -> Result<Self, BuildError> {
        match error {
            BuildError::InvalidSandwichOrder(e) => Ok(Self::InvalidSandwichOrder(e)),
            BuildError::Signer(e) => Ok(Self::SignerContractBreak(e)),
            other @ BuildError::FeeCapExceeded { .. } => Err(other)
        }
    }
}
