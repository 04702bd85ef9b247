//! The `Relay` collaborator (§6): `submit(bundle_bytes) -> RelayOutcome` plus
//! a stable `name()`. The dispatcher treats every implementation uniformly.

use vanguard_types::{BundleId, RelayId, RelayOutcome};

#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait Relay: Send + Sync {
    fn id(&self) -> RelayId;

    fn name(&self) -> &str;

    async fn submit(&self, bundle_id: BundleId, bundle_bytes: &[u8]) -> RelayOutcome;
}
