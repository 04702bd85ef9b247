//! Hot in-memory AMM pool state cache plus constant-product math (§4.3,
//! component C3 — the "shadow fork").

pub mod amm;
pub mod cache;
pub mod error;
pub mod provider;

pub use amm::{amount_out, simulate_hop, simulate_sandwich};
pub use cache::{PoolCache, DEFAULT_CAPACITY, DEFAULT_FETCH_TIMEOUT, DEFAULT_STALE_AFTER_SLOTS};
pub use error::PoolLookupError;
pub use provider::{FetchOutcome, StateProvider};
