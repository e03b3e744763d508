//! Bounded handoff queue between the realtime callback and background
//! consumers.
//!
//! The producer side never blocks: a full queue drops the item and reports
//! [`EnqueueOutcome::Dropped`]. The consumer side blocks until an item
//! arrives, and observes a closed queue (all producers gone, buffer
//! drained) as `None`. This drop-on-full discipline is the backpressure
//! contract of the whole bridge, favoring the realtime side over delivery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Default capacity, sized to absorb burst traffic between processing
/// blocks under normal load.
pub const DEFAULT_CAPACITY: usize = 64;

/// Result of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    Dropped,
}

impl EnqueueOutcome {
    #[inline]
    pub fn is_dropped(self) -> bool {
        self == EnqueueOutcome::Dropped
    }
}

/// Shared drop counter, readable after the producer has been moved into a
/// callback.
#[derive(Debug, Clone, Default)]
pub struct DropCounter(Arc<AtomicU64>);

impl DropCounter {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Producer side -- push from the realtime thread, never blocking.
pub struct QueueProducer<T> {
    sender: Sender<T>,
    dropped: DropCounter,
}

impl<T> QueueProducer<T> {
    /// Attempt to enqueue without blocking. A full or closed queue drops
    /// the item and bumps the drop counter.
    #[inline]
    pub fn try_enqueue(&self, item: T) -> EnqueueOutcome {
        match self.sender.try_send(item) {
            Ok(()) => EnqueueOutcome::Enqueued,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.increment();
                EnqueueOutcome::Dropped
            }
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.get()
    }

    pub fn drop_counter(&self) -> DropCounter {
        self.dropped.clone()
    }
}

/// Consumer side -- blocking drain from a background thread.
pub struct QueueConsumer<T> {
    receiver: Receiver<T>,
}

impl<T> QueueConsumer<T> {
    /// Blocks until an item arrives. Returns `None` once every producer is
    /// gone and the buffer is drained.
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// Non-blocking pop, for tests and shutdown drains.
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Create a fixed-capacity queue pair. Capacity is never resized.
pub fn bounded_queue<T>(capacity: usize) -> (QueueProducer<T>, QueueConsumer<T>) {
    assert!(capacity > 0, "queue capacity must be nonzero");
    let (sender, receiver) = bounded(capacity);
    (
        QueueProducer {
            sender,
            dropped: DropCounter::default(),
        },
        QueueConsumer { receiver },
    )
}
