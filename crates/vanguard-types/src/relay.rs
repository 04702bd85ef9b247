use std::time::Duration;

use thiserror::Error;

use crate::ids::{BundleId, RelayId};

/// Why a relay submission did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("relay did not respond within the submit deadline")]
    Timeout,
    #[error("relay rejected the bundle: {0}")]
    Rejected(String),
    #[error("relay transport error: {0}")]
    Transport(String)
}

/// Outcome of submitting one [`crate::bundle::Bundle`] to one relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub relay_id: RelayId,
    pub success: bool,
    pub bundle_id: Option<BundleId>,
    pub latency: Duration,
    pub error: Option<RelayError>
}

impl RelayOutcome {
    pub fn success(relay_id: RelayId, bundle_id: BundleId, latency: Duration) -> Self {
        Self { relay_id, success: true, bundle_id: Some(bundle_id), latency, error: None }
    }

    pub fn failure(relay_id: RelayId, latency: Duration, error: RelayError) -> Self {
        Self { relay_id, success: false, bundle_id: None, latency, error: Some(error) }
    }
}
