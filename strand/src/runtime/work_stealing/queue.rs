use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A per-worker local task queue.
///
/// The owner pushes and pops at the back (LIFO), which keeps a freshly
/// spawned task hot in cache. Thieves take from the front (FIFO), so the
/// oldest work migrates first.
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        lock(&self.inner).push_back(task);
    }

    /// Takes the most recently pushed task. Owner only.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.inner).pop_back()
    }

    /// Takes the oldest task. Used by other workers.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.inner).pop_front()
    }
}
