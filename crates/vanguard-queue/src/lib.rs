//! Bounded, priority-ordered backpressure queue (§4.7, component C7).

pub mod item;
pub mod queue;

pub use item::{Prioritized, QueuedTransaction};
pub use queue::{BackpressureQueue, EnqueueOutcome, DEFAULT_CAPACITY};
