//! Deferred FIFO queue shared between producers and the tick loop.
//!
//! Producers (pointer callbacks, regions bubbling events, the model) append
//! with [`EventQueue::enqueue`] at any time. The coordinator calls
//! [`EventQueue::drain`] once per tick: the whole backlog is swapped out under
//! the lock and handed back, so items are processed with no lock held and
//! anything enqueued afterwards waits for the next drain.

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// FIFO of pending items. Cloning yields another handle to the same queue.
#[derive(Debug)]
pub struct EventQueue<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(VecDeque::new())) }
    }

    /// Append `item` to the back of the queue.
    pub fn enqueue(&self, item: T) {
        self.lock().push_back(item);
    }

    /// Take every queued item, oldest first, leaving the queue empty.
    #[must_use]
    pub fn drain(&self) -> Vec<T> {
        let taken = std::mem::take(&mut *self.lock());
        Vec::from(taken)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A producer that panicked mid-push cannot leave a half-written item in a
    // VecDeque, so a poisoned lock still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
