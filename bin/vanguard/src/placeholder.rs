//! Placeholder collaborator implementations.
//!
//! §1 scopes the concrete chain wire protocol, key storage, and relay
//! transports out of this repository: they're named interfaces
//! (`StateProvider`, `Signer`, `Relay`) a real deployment supplies. These
//! implementations exist only so the binary has something runnable to wire
//! against; they are not meant to see production traffic.

use std::time::Duration;

use async_trait::async_trait;
use vanguard_bundle::{Signer, SignerContractBreak};
use vanguard_poolcache::{FetchOutcome, StateProvider};
use vanguard_relay::Relay;
use vanguard_types::{BundleId, PoolId, RelayError, RelayId, RelayOutcome};

/// Always reports a miss. A real deployment's `StateProvider` talks to a
/// shadow fork, a node RPC, or a state-diff replayer.
pub struct PlaceholderStateProvider;

#[async_trait]
impl StateProvider for PlaceholderStateProvider {
    async fn get_pool(&self, pool_id: PoolId, _max_age: Duration) -> FetchOutcome {
        tracing::debug!(%pool_id, "placeholder state provider has no pools configured");
        FetchOutcome::NotFound
    }
}

/// Signs by appending a fixed tag rather than holding any key material. A
/// real deployment's `Signer` calls out to a keystore or HSM.
pub struct PlaceholderSigner;

#[async_trait]
impl Signer for PlaceholderSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerContractBreak> {
        let mut signature = message.to_vec();
        signature.extend_from_slice(b"placeholder-signature");
        Ok(signature)
    }
}

/// Logs the submission and reports failure. A real deployment's `Relay`
/// speaks whatever wire protocol the target relay expects.
pub struct PlaceholderRelay {
    id: RelayId,
    name: String
}

impl PlaceholderRelay {
    pub fn new(id: u32, name: String) -> Self {
        Self { id: RelayId(id), name }
    }
}

#[async_trait]
impl Relay for PlaceholderRelay {
    fn id(&self) -> RelayId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, bundle_id: BundleId, bundle_bytes: &[u8]) -> RelayOutcome {
        tracing::warn!(
            relay = %self.name,
            %bundle_id,
            bytes = bundle_bytes.len(),
            "placeholder relay does not submit anywhere, configure a real Relay for production use"
        );
        RelayOutcome::failure(
            self.id,
            Duration::ZERO,
            RelayError::Transport("no relay transport configured".into())
        )
    }
}
