use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration
};

use vanguard_types::{BundleId, RelayError, RelayId, RelayOutcome};

/// `Relay` double whose outcome is configurable up front and whose submit
/// count is observable afterwards.
#[derive(Debug)]
pub struct MockRelay {
    id: RelayId,
    name: &'static str,
    should_fail: AtomicBool,
    submit_count: AtomicUsize
}

impl MockRelay {
    pub fn new(id: u32, name: &'static str) -> Self {
        Self { id: RelayId(id), name, should_fail: AtomicBool::new(false), submit_count: AtomicUsize::new(0) }
    }

    pub fn always_fails(id: u32, name: &'static str) -> Self {
        let relay = Self::new(id, name);
        relay.should_fail.store(true, Ordering::SeqCst);
        relay
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl vanguard_relay::Relay for MockRelay {
    fn id(&self) -> RelayId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    async fn submit(&self, bundle_id: BundleId, _bundle_bytes: &[u8]) -> RelayOutcome {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            RelayOutcome::failure(self.id, Duration::from_millis(1), RelayError::Rejected("mock relay configured to fail".into()))
        } else {
            RelayOutcome::success(self.id, bundle_id, Duration::from_millis(1))
        }
    }
}
