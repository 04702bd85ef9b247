//! Bounded priority queue for backpressure (§4.7, component C7).

use std::collections::{BTreeMap, VecDeque};

use parking_lot::Mutex;
use tracing::debug;

use crate::item::Prioritized;

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Result of an [`BackpressureQueue::enqueue`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Accepted with room to spare.
    Accepted,
    /// Accepted, but the queue was full: the lowest-priority resident item
    /// was evicted to make room.
    AcceptedWithEviction,
    /// Rejected: the queue was full and the incoming item's priority was
    /// not higher than every resident item's priority. The queue is
    /// unchanged.
    Rejected
}

struct Inner<T> {
    by_priority: BTreeMap<u64, VecDeque<T>>,
    len: usize
}

/// A bounded FIFO ordered by descending transaction priority-fee.
///
/// On overflow the lowest-priority resident is evicted rather than the
/// newest arrival, so a burst of low-fee spam can't starve a late-arriving,
/// high-fee opportunity (§4.7). Same-priority items are served FIFO.
pub struct BackpressureQueue<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>
}

impl<T: Prioritized> BackpressureQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, inner: Mutex::new(Inner { by_priority: BTreeMap::new(), len: 0 }) }
    }

    /// Enqueues `item`, evicting the lowest-priority resident if the queue
    /// is full and `item` outranks it. Returns the evicted item, if any,
    /// alongside the outcome so callers can account for it in metrics
    /// (`QueueOverflow` is a metric-only operational signal, not a typed
    /// error — see §7).
    pub fn enqueue(&self, item: T) -> (EnqueueOutcome, Option<T>) {
        let mut inner = self.inner.lock();
        let priority = item.priority();

        if inner.len < self.capacity {
            inner.by_priority.entry(priority).or_default().push_back(item);
            inner.len += 1;
            return (EnqueueOutcome::Accepted, None);
        }

        let min_priority = match inner.by_priority.keys().next().copied() {
            Some(p) => p,
            None => {
                // capacity == 0: nothing to evict, nothing fits.
                return (EnqueueOutcome::Rejected, None);
            }
        };

        if priority <= min_priority {
            debug!(priority, min_priority, "queue full, incoming priority too low, rejecting");
            return (EnqueueOutcome::Rejected, None);
        }

        let evicted = {
            let bucket = inner.by_priority.get_mut(&min_priority).expect("min_priority bucket exists");
            let evicted = bucket.pop_front().expect("non-empty bucket");
            if bucket.is_empty() {
                inner.by_priority.remove(&min_priority);
            }
            evicted
        };
        inner.by_priority.entry(priority).or_default().push_back(item);
        (EnqueueOutcome::AcceptedWithEviction, Some(evicted))
    }

    /// Dequeues the highest-priority resident, FIFO among ties.
    pub fn dequeue(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        let max_priority = *inner.by_priority.keys().next_back()?;
        let bucket = inner.by_priority.get_mut(&max_priority)?;
        let item = bucket.pop_front()?;
        if bucket.is_empty() {
            inner.by_priority.remove(&max_priority);
        }
        inner.len -= 1;
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fill level in `[0.0, 1.0]`, reported to telemetry per §4.7.
    pub fn fill_level(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.len() as f64 / self.capacity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    struct Item(u64);

    impl Prioritized for Item {
        fn priority(&self) -> u64 {
            self.0
        }
    }

    /// Scenario S5 verbatim: capacity=3, enqueue [10,20,30] (full), enqueue
    /// 25 -> accepted, evicts 10, leaving {20,25,30}; enqueue 5 -> rejected,
    /// queue unchanged.
    #[test]
    fn scenario_s5_queue_overflow_with_priority_eviction() {
        let queue = BackpressureQueue::new(3);
        for priority in [10, 20, 30] {
            let (outcome, evicted) = queue.enqueue(Item(priority));
            assert_eq!(outcome, EnqueueOutcome::Accepted);
            assert!(evicted.is_none());
        }

        let (outcome, evicted) = queue.enqueue(Item(25));
        assert_eq!(outcome, EnqueueOutcome::AcceptedWithEviction);
        assert_eq!(evicted, Some(Item(10)));
        assert_eq!(queue.len(), 3);

        let mut remaining = Vec::new();
        while let Some(item) = queue.dequeue() {
            remaining.push(item.0);
        }
        assert_eq!(remaining, vec![30, 25, 20]);

        // re-populate to re-test the rejection path on a full queue
        let queue = BackpressureQueue::new(3);
        for priority in [20, 25, 30] {
            queue.enqueue(Item(priority));
        }
        let (outcome, evicted) = queue.enqueue(Item(5));
        assert_eq!(outcome, EnqueueOutcome::Rejected);
        assert!(evicted.is_none());
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn dequeue_respects_priority_then_fifo() {
        let queue = BackpressureQueue::new(10);
        queue.enqueue(Item(5));
        queue.enqueue(Item(5));
        queue.enqueue(Item(9));
        assert_eq!(queue.dequeue(), Some(Item(9)));
        assert_eq!(queue.dequeue(), Some(Item(5)));
        assert_eq!(queue.dequeue(), Some(Item(5)));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn fill_level_tracks_occupancy() {
        let queue = BackpressureQueue::new(4);
        assert_eq!(queue.fill_level(), 0.0);
        queue.enqueue(Item(1));
        queue.enqueue(Item(2));
        assert_eq!(queue.fill_level(), 0.5);
    }

    proptest::proptest! {
        #[test]
        fn never_exceeds_capacity(priorities in proptest::collection::vec(0u64..1000, 0..200)) {
            let queue = BackpressureQueue::new(50);
            for p in priorities {
                queue.enqueue(Item(p));
                proptest::prop_assert!(queue.len() <= 50);
            }
        }
    }
}
