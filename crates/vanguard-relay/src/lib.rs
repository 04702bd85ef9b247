//! Multi-relay dispatch with failover (§4.6, component C6).

pub mod dispatcher;
pub mod error;
pub mod health;
pub mod relay;

pub use dispatcher::{DispatchOneError, RelayDispatcher, DEFAULT_SUBMIT_TIMEOUT};
pub use error::{DuplicateDispatch, RelayUnhealthy};
pub use health::{RelayHealth, DEFAULT_CONSECUTIVE_FAILURE_THRESHOLD};
pub use relay::Relay;
