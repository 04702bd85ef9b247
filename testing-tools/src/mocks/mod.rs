pub mod relay;
pub mod signer;
pub mod state_provider;

pub use relay::MockRelay;
pub use signer::{BrokenSigner, MockSigner};
pub use state_provider::MockStateProvider;
